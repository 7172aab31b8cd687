//! Physical constants and conversions into the internal unit system.
//!
//! Internal units are Dalton (mass), Ångström (length) and femtosecond
//! (time), so energy is measured in Da·Å²/fs². Every temperature
//! computation goes through [`BOLTZMANN_INTERNAL`].

/// Avogadro's number, 1/mol.
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Boltzmann's constant, J/K.
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Kilograms to Daltons.
pub const KG_TO_DALTON: f64 = 6.022_173_6e26;

/// Metres to Ångströms.
pub const M_TO_ANGSTROM: f64 = 1e10;

/// Seconds to femtoseconds.
pub const SEC_TO_FS: f64 = 1e15;

/// Litres to cubic Ångströms.
pub const LITRE_TO_CUBIC_ANGSTROM: f64 = M_TO_ANGSTROM * M_TO_ANGSTROM * M_TO_ANGSTROM / 1e3;

/// kJ/mol to Joules per particle.
pub const KJMOL_TO_JOULE: f64 = 1000.0 / AVOGADRO;

/// Electronvolts to Joules.
pub const EV_TO_JOULE: f64 = 1.602_176_565e-19;

/// Joules to internal energy units (Da·Å²/fs²).
pub const JOULE_TO_INTERNAL: f64 =
    KG_TO_DALTON * (M_TO_ANGSTROM * M_TO_ANGSTROM) / (SEC_TO_FS * SEC_TO_FS);

/// Electronvolts to internal energy units.
pub const EV_TO_INTERNAL: f64 = EV_TO_JOULE * JOULE_TO_INTERNAL;

/// Boltzmann's constant in internal energy units per Kelvin.
pub const BOLTZMANN_INTERNAL: f64 = BOLTZMANN * JOULE_TO_INTERNAL;
