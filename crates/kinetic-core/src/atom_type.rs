//! Per-species parameters.
//!
//! An [`AtomType`] is immutable once built and shared between the
//! atomic state and force kernels through `Arc<AtomType>`. Named
//! parameters are an open set: force models look up what they need
//! (`"sigma_lj"`, `"eps_lj"`) and report a missing one as an error.

use std::fmt;

use indexmap::IndexMap;

use crate::error::AtomTypeError;
use crate::units::EV_TO_INTERNAL;

/// Lennard-Jones length parameter name, Å.
pub const SIGMA_LJ: &str = "sigma_lj";

/// Lennard-Jones well depth parameter name, internal energy units.
pub const EPS_LJ: &str = "eps_lj";

/// Built-in defaults for a chemical element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementDefaults {
    /// Mass in Daltons.
    pub mass: f64,
    /// Nuclear charge.
    pub nuclear_charge: u32,
    /// Electron count.
    pub num_electrons: u32,
    /// Lennard-Jones σ, Å.
    pub sigma_lj: f64,
    /// Lennard-Jones ε, eV.
    pub eps_lj_ev: f64,
}

/// Defaults for the elements the engine knows about (`"H"`, `"O"`, `"Ar"`).
pub fn element_defaults(id: &str) -> Option<ElementDefaults> {
    match id {
        "H" => Some(ElementDefaults {
            mass: 1.0,
            nuclear_charge: 1,
            num_electrons: 1,
            sigma_lj: 0.552_357_0,
            eps_lj_ev: 4.477_890_0,
        }),
        "O" => Some(ElementDefaults {
            mass: 16.0,
            nuclear_charge: 8,
            num_electrons: 8,
            sigma_lj: 1.175_990_0,
            eps_lj_ev: 5.126_470_0,
        }),
        "Ar" => Some(ElementDefaults {
            mass: 39.948,
            nuclear_charge: 18,
            num_electrons: 18,
            sigma_lj: 3.405,
            eps_lj_ev: 0.012_352_9,
        }),
        _ => None,
    }
}

/// An immutable description of one atom species.
#[derive(Clone, Debug, PartialEq)]
pub struct AtomType {
    id: String,
    mass: f64,
    nuclear_charge: u32,
    num_electrons: u32,
    params: IndexMap<String, f64>,
}

impl AtomType {
    /// Start building an atom type with the given identifier.
    ///
    /// For known elements, unset fields fall back to [`element_defaults`].
    pub fn builder(id: impl Into<String>) -> AtomTypeBuilder {
        AtomTypeBuilder {
            id: id.into(),
            mass: None,
            nuclear_charge: None,
            num_electrons: None,
            params: IndexMap::new(),
        }
    }

    /// Species identifier, unique within a simulation.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Mass in Daltons.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Nuclear charge.
    pub fn nuclear_charge(&self) -> u32 {
        self.nuclear_charge
    }

    /// Electron count.
    pub fn num_electrons(&self) -> u32 {
        self.num_electrons
    }

    /// Look up a named parameter, or `None` if absent.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }

    /// Look up a named parameter, failing with
    /// [`AtomTypeError::MissingParameter`] if absent.
    pub fn param(&self, name: &str) -> Result<f64, AtomTypeError> {
        self.get(name).ok_or_else(|| AtomTypeError::MissingParameter {
            atom_type: self.id.clone(),
            name: name.to_string(),
        })
    }

    /// All named parameters in insertion order.
    pub fn params(&self) -> &IndexMap<String, f64> {
        &self.params
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (mass {} Da, Z = {}, {} electrons)",
            self.id, self.mass, self.nuclear_charge, self.num_electrons
        )
    }
}

/// Builder for [`AtomType`].
///
/// # Examples
///
/// ```
/// use kinetic_core::AtomType;
///
/// let ar = AtomType::builder("Ar").build().unwrap();
/// assert_eq!(ar.mass(), 39.948);
///
/// let x = AtomType::builder("X")
///     .mass(12.0)
///     .nuclear_charge(6)
///     .num_electrons(6)
///     .param("sigma_lj", 3.4)
///     .build()
///     .unwrap();
/// assert_eq!(x.get("sigma_lj"), Some(3.4));
/// ```
#[derive(Clone, Debug)]
pub struct AtomTypeBuilder {
    id: String,
    mass: Option<f64>,
    nuclear_charge: Option<u32>,
    num_electrons: Option<u32>,
    params: IndexMap<String, f64>,
}

impl AtomTypeBuilder {
    /// Mass in Daltons.
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Nuclear charge.
    pub fn nuclear_charge(mut self, z: u32) -> Self {
        self.nuclear_charge = Some(z);
        self
    }

    /// Electron count.
    pub fn num_electrons(mut self, n: u32) -> Self {
        self.num_electrons = Some(n);
        self
    }

    /// Set a named parameter. Energies are expected in internal units.
    pub fn param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Build the atom type.
    ///
    /// Missing fields are filled from [`element_defaults`] when the
    /// identifier names a known element; the default Lennard-Jones ε is
    /// converted from eV to internal units.
    pub fn build(self) -> Result<AtomType, AtomTypeError> {
        if self.id.is_empty() {
            return Err(AtomTypeError::EmptyId);
        }
        let defaults = element_defaults(&self.id);
        let missing = |name: &str| AtomTypeError::MissingParameter {
            atom_type: self.id.clone(),
            name: name.to_string(),
        };

        let mass = self
            .mass
            .or(defaults.map(|d| d.mass))
            .ok_or_else(|| missing("mass"))?;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(AtomTypeError::InvalidParameter {
                atom_type: self.id.clone(),
                name: "mass".to_string(),
                value: mass,
            });
        }
        let nuclear_charge = self
            .nuclear_charge
            .or(defaults.map(|d| d.nuclear_charge))
            .ok_or_else(|| missing("nuclear_charge"))?;
        let num_electrons = self
            .num_electrons
            .or(defaults.map(|d| d.num_electrons))
            .ok_or_else(|| missing("num_electrons"))?;

        let mut params = self.params;
        if let Some(d) = defaults {
            params.entry(SIGMA_LJ.to_string()).or_insert(d.sigma_lj);
            params
                .entry(EPS_LJ.to_string())
                .or_insert(d.eps_lj_ev * EV_TO_INTERNAL);
        }

        Ok(AtomType {
            id: self.id,
            mass,
            nuclear_charge,
            num_electrons,
            params,
        })
    }
}
