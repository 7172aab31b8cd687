//! Simulation configuration, construction factories and error types.
//!
//! Each component has a typed config decoded from [`Params`] by
//! `from_params()` and turned into a trait object by `build()`.
//! [`SimulationConfig`] ties them together and assembles a
//! [`MolecularDynamics`].

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use kinetic_cell::{Cell, CellError, CubicCell, UnboundedCell};
use kinetic_core::AtomicState;
use kinetic_force::{Force, ForceError};
use kinetic_forces::LennardJones;
use kinetic_integrate::{Andersen, Evans, Integrate, IntegrateError, Thermostat, VelocityVerlet};

use crate::molecular_dynamics::MolecularDynamics;
use crate::params::Params;
use crate::writer::{ThermodynamicsWriter, WriteError, Writer, XyzWriter};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while decoding, validating or assembling a simulation.
#[derive(Debug)]
pub enum ConfigError {
    /// A `type` key named something no factory knows.
    UnrecognisedType {
        /// Which factory rejected it (`"cell"`, `"force"`, ...).
        component: &'static str,
        /// The rejected type name.
        kind: String,
    },
    /// A required key is absent.
    MissingParameter {
        /// The missing key.
        name: String,
    },
    /// A key holds a value of the wrong type.
    WrongType {
        /// The offending key.
        name: String,
        /// What the factory expected.
        expected: &'static str,
        /// What was found.
        actual: &'static str,
    },
    /// A value is well-typed but out of range or inconsistent.
    InvalidParameter {
        /// The offending key.
        name: String,
        /// Description of the problem.
        reason: String,
    },
    /// No cell was supplied.
    MissingCell,
    /// No integrator was supplied.
    MissingIntegrator,
    /// No force models were supplied.
    NoForces,
    /// The state has no velocity or force buffers.
    StaticState,
    /// A writer was registered with frequency zero.
    ZeroFrequency {
        /// The writer's name.
        writer: String,
    },
    /// Cell construction failed.
    Cell(CellError),
    /// Force construction failed.
    Force(ForceError),
    /// Integrator or thermostat construction or initialisation failed.
    Integrate(IntegrateError),
    /// An output file could not be opened.
    Output(WriteError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognisedType { component, kind } => {
                write!(f, "unrecognised {component}: {kind}")
            }
            Self::MissingParameter { name } => {
                write!(f, "required parameter '{name}' was not found")
            }
            Self::WrongType {
                name,
                expected,
                actual,
            } => write!(f, "parameter '{name}' should be a {expected}, got a {actual}"),
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
            Self::MissingCell => write!(f, "no cell configured"),
            Self::MissingIntegrator => write!(f, "no integrator configured"),
            Self::NoForces => write!(f, "no forces configured"),
            Self::StaticState => {
                write!(f, "molecular dynamics needs a state with velocities and forces")
            }
            Self::ZeroFrequency { writer } => {
                write!(f, "output frequency of writer '{writer}' must be at least 1")
            }
            Self::Cell(e) => write!(f, "cell: {e}"),
            Self::Force(e) => write!(f, "force: {e}"),
            Self::Integrate(e) => write!(f, "integrator: {e}"),
            Self::Output(e) => write!(f, "output: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cell(e) => Some(e),
            Self::Force(e) => Some(e),
            Self::Integrate(e) => Some(e),
            Self::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CellError> for ConfigError {
    fn from(e: CellError) -> Self {
        Self::Cell(e)
    }
}

impl From<ForceError> for ConfigError {
    fn from(e: ForceError) -> Self {
        Self::Force(e)
    }
}

impl From<IntegrateError> for ConfigError {
    fn from(e: IntegrateError) -> Self {
        Self::Integrate(e)
    }
}

impl From<WriteError> for ConfigError {
    fn from(e: WriteError) -> Self {
        Self::Output(e)
    }
}

/// Whether `rest` is `<i>.<key>` with `i < count` written canonically and
/// `key` one of `keys`.
fn indexed_key(rest: &str, count: usize, keys: &[&str]) -> bool {
    let Some((index, key)) = rest.split_once('.') else {
        return false;
    };
    index
        .parse::<usize>()
        .is_ok_and(|i| i < count && i.to_string() == index)
        && keys.contains(&key)
}

fn unrecognised(component: &'static str, kind: &str) -> ConfigError {
    ConfigError::UnrecognisedType {
        component,
        kind: kind.to_owned(),
    }
}

// ── CellConfig ─────────────────────────────────────────────────────

/// Simulation cell selection.
///
/// Keys: `type` (`"Unbounded"` or `"Cubic"`), `length` (Cubic only, Å).
#[derive(Clone, Debug, PartialEq)]
pub enum CellConfig {
    /// Open boundaries.
    Unbounded,
    /// Periodic cube.
    Cubic {
        /// Side length, Å.
        length: f64,
    },
}

impl CellConfig {
    const KEYS: &'static [&'static str] = &["type", "length"];

    /// Decode from `type` and `length`.
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        match params.require_str("type")? {
            "Unbounded" => Ok(Self::Unbounded),
            "Cubic" => Ok(Self::Cubic {
                length: params.require_f64("length")?,
            }),
            other => Err(unrecognised("cell", other)),
        }
    }

    /// The configured type name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unbounded => "Unbounded",
            Self::Cubic { .. } => "Cubic",
        }
    }

    /// Construct the cell.
    pub fn build(&self) -> Result<Box<dyn Cell>, ConfigError> {
        log::info!("Creating cell of type: {}", self.kind());
        Ok(match *self {
            Self::Unbounded => Box::new(UnboundedCell::new()),
            Self::Cubic { length } => Box::new(CubicCell::new(length)?),
        })
    }
}

// ── ForceConfig ────────────────────────────────────────────────────

/// Force model selection. Keys: `type` (`"LennardJones"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceConfig {
    /// All-pairs 12-6 Lennard-Jones with Lorentz-Berthelot mixing.
    LennardJones,
}

impl ForceConfig {
    const KEYS: &'static [&'static str] = &["type"];

    /// Decode from `type`.
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        match params.require_str("type")? {
            "LennardJones" => Ok(Self::LennardJones),
            other => Err(unrecognised("force", other)),
        }
    }

    /// The configured type name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LennardJones => "LennardJones",
        }
    }

    /// Construct the force model for the species present in `state`.
    pub fn build(&self, state: &AtomicState) -> Result<Box<dyn Force>, ConfigError> {
        log::info!("Creating force of type: {}", self.kind());
        Ok(match self {
            Self::LennardJones => Box::new(LennardJones::for_state(state)?),
        })
    }
}

// ── ControlConfig ──────────────────────────────────────────────────

/// Thermostat selection.
///
/// Keys (relative to the integrator section): `control.type`
/// (`"Evans"` or `"Andersen"`), `control.temperature` (K), and for
/// Andersen `control.t_relax` (fs, required) and `control.softness`
/// (default 0).
#[derive(Clone, Debug, PartialEq)]
pub enum ControlConfig {
    /// Isokinetic friction.
    Evans {
        /// Initial temperature, K.
        temperature: f64,
    },
    /// Stochastic collisions.
    Andersen {
        /// Bath temperature, K.
        temperature: f64,
        /// Mean time between collisions, fs.
        t_relax: f64,
        /// Fraction of the old velocity kept in a collision.
        softness: f64,
    },
}

impl ControlConfig {
    /// Decode from the `control.*` keys. Returns `None` when
    /// `control.type` is absent.
    pub fn from_params(params: &Params) -> Result<Option<Self>, ConfigError> {
        let Some(kind) = params.str("control.type")? else {
            return Ok(None);
        };
        let temperature = params.require_f64("control.temperature")?;
        match kind {
            "Evans" => Ok(Some(Self::Evans { temperature })),
            "Andersen" => Ok(Some(Self::Andersen {
                temperature,
                t_relax: params.require_f64("control.t_relax")?,
                softness: params.f64("control.softness")?.unwrap_or(0.0),
            })),
            other => Err(unrecognised("thermostat", other)),
        }
    }

    /// The configured type name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Evans { .. } => "Evans",
            Self::Andersen { .. } => "Andersen",
        }
    }

    /// Target temperature, K.
    pub fn temperature(&self) -> f64 {
        match *self {
            Self::Evans { temperature } | Self::Andersen { temperature, .. } => temperature,
        }
    }

    /// Construct the thermostat.
    pub fn build(&self) -> Result<Box<dyn Thermostat>, ConfigError> {
        Ok(match *self {
            Self::Evans { temperature } => Box::new(Evans::new(temperature)?),
            Self::Andersen {
                temperature,
                t_relax,
                softness,
            } => Box::new(
                Andersen::builder()
                    .temperature(temperature)
                    .relaxation_time(t_relax)
                    .softness(softness)
                    .build()?,
            ),
        })
    }
}

// ── IntegratorConfig ───────────────────────────────────────────────

/// Statistical ensemble sampled by the integrator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ensemble {
    /// Constant particle number, volume and energy.
    #[default]
    Nve,
    /// Constant particle number, volume and temperature.
    Nvt,
}

impl Ensemble {
    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "NVE" => Ok(Self::Nve),
            "NVT" => Ok(Self::Nvt),
            other => Err(unrecognised("ensemble", other)),
        }
    }
}

/// Velocity Verlet integrator configuration.
///
/// Keys: `type` (`"VelocityVerlet"`), `timestep` (fs), `num_steps`,
/// `seed` (default 0), `ensemble` (`"NVE"` or `"NVT"`, default NVE) and
/// the `control.*` keys of [`ControlConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct IntegratorConfig {
    /// Timestep, fs.
    pub timestep: f64,
    /// Number of steps a run performs.
    pub num_steps: u64,
    /// Seed for the integrator's RNG.
    pub seed: u64,
    /// Target ensemble.
    pub ensemble: Ensemble,
    /// Thermostat; required for NVT, forbidden for NVE.
    pub control: Option<ControlConfig>,
}

impl IntegratorConfig {
    const KEYS: &'static [&'static str] = &[
        "type",
        "timestep",
        "num_steps",
        "seed",
        "ensemble",
        "control.type",
        "control.temperature",
        "control.t_relax",
        "control.softness",
    ];

    /// Decode and validate.
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        let kind = params.require_str("type")?;
        if kind != "VelocityVerlet" {
            return Err(unrecognised("integrator", kind));
        }
        let config = Self {
            timestep: params.require_f64("timestep")?,
            num_steps: params.require_u64("num_steps")?,
            seed: params.u64("seed")?.unwrap_or(0),
            ensemble: match params.str("ensemble")? {
                Some(s) => Ensemble::parse(s)?,
                None => Ensemble::default(),
            },
            control: ControlConfig::from_params(params)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the ensemble and thermostat agree.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.ensemble, &self.control) {
            (Ensemble::Nvt, None) => Err(ConfigError::MissingParameter {
                name: "control.type".to_owned(),
            }),
            (Ensemble::Nve, Some(control)) => Err(ConfigError::InvalidParameter {
                name: "ensemble".to_owned(),
                reason: format!("{} thermostat requires the NVT ensemble", control.kind()),
            }),
            _ => Ok(()),
        }
    }

    /// Construct the integrator with its thermostat composed in.
    pub fn build(&self) -> Result<Box<dyn Integrate>, ConfigError> {
        self.validate()?;
        log::info!("Creating integrator of type: VelocityVerlet");
        let mut builder = VelocityVerlet::builder()
            .timestep(self.timestep)
            .num_steps(self.num_steps)
            .seed(self.seed);
        match &self.control {
            Some(control) => {
                log::info!(
                    "Creating Velocity Verlet integrator with {} thermostat at temperature {:.2}K",
                    control.kind(),
                    control.temperature()
                );
                builder = builder.thermostat(control.build()?);
            }
            None => log::info!("Creating Velocity Verlet integrator with no controller"),
        }
        Ok(Box::new(builder.build()?))
    }
}

// ── OutputConfig ───────────────────────────────────────────────────

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// `.xyz` trajectory.
    Xyz,
    /// Thermodynamics table.
    Thermodynamics,
}

/// Periodic writer configuration.
///
/// Keys: `type` (`"xyz"` or `"thermo"`), `path`, `frequency` (steps, ≥ 1).
#[derive(Clone, Debug, PartialEq)]
pub struct OutputConfig {
    /// Output format.
    pub kind: OutputKind,
    /// Destination file.
    pub path: PathBuf,
    /// Write every `frequency` steps.
    pub frequency: u64,
}

impl OutputConfig {
    const KEYS: &'static [&'static str] = &["type", "path", "frequency"];

    /// Decode and validate.
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        let kind = match params.require_str("type")? {
            "xyz" => OutputKind::Xyz,
            "thermo" => OutputKind::Thermodynamics,
            other => return Err(unrecognised("writer", other)),
        };
        let config = Self {
            kind,
            path: PathBuf::from(params.require_str("path")?),
            frequency: params.require_u64("frequency")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject a zero frequency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frequency == 0 {
            return Err(ConfigError::ZeroFrequency {
                writer: self.path.display().to_string(),
            });
        }
        Ok(())
    }

    /// Open the destination file and construct the writer.
    pub fn build(&self) -> Result<Box<dyn Writer>, ConfigError> {
        log::info!(
            "Creating writer of type: {:?} at {}",
            self.kind,
            self.path.display()
        );
        Ok(match self.kind {
            OutputKind::Xyz => Box::new(XyzWriter::create(&self.path)?),
            OutputKind::Thermodynamics => Box::new(ThermodynamicsWriter::create(&self.path)?),
        })
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for a molecular-dynamics run.
///
/// Decoded from sections of a single [`Params`]: `Cell.*`,
/// `Integrator.*`, `Forces.<i>.*` and `Outputs.<i>.*`, with `type` at
/// the top level set to `"MolecularDynamics"`. Numbered sections must
/// run consecutively from 0, and every key must belong to a decoded
/// section.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Simulation cell.
    pub cell: CellConfig,
    /// Integrator and thermostat.
    pub integrator: IntegratorConfig,
    /// Force models, summed in order.
    pub forces: Vec<ForceConfig>,
    /// Periodic writers.
    pub outputs: Vec<OutputConfig>,
}

impl SimulationConfig {
    /// Decode every section and validate.
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        let kind = params.require_str("type")?;
        if kind != "MolecularDynamics" {
            return Err(unrecognised("simulation", kind));
        }
        let config = Self {
            cell: CellConfig::from_params(&params.section("Cell"))?,
            integrator: IntegratorConfig::from_params(&params.section("Integrator"))?,
            forces: params
                .indexed_sections("Forces")
                .iter()
                .map(ForceConfig::from_params)
                .collect::<Result<_, _>>()?,
            outputs: params
                .indexed_sections("Outputs")
                .iter()
                .map(OutputConfig::from_params)
                .collect::<Result<_, _>>()?,
        };
        config.check_keys(params)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject keys that no decoded section consumed.
    fn check_keys(&self, params: &Params) -> Result<(), ConfigError> {
        for (key, _) in params.iter() {
            if key == "type" {
                continue;
            }
            let (section, rest) = key.split_once('.').unwrap_or((key, ""));
            let accepted = match section {
                "Cell" => CellConfig::KEYS.contains(&rest),
                "Integrator" => IntegratorConfig::KEYS.contains(&rest),
                "Forces" => indexed_key(rest, self.forces.len(), ForceConfig::KEYS),
                "Outputs" => indexed_key(rest, self.outputs.len(), OutputConfig::KEYS),
                _ => false,
            };
            if !accepted {
                let section_keys: &[&str] = match section {
                    "Forces" => ForceConfig::KEYS,
                    "Outputs" => OutputConfig::KEYS,
                    _ => &[],
                };
                let misnumbered = rest
                    .split_once('.')
                    .is_some_and(|(_, k)| section_keys.contains(&k));
                let reason = if misnumbered {
                    format!("{section} sections must be numbered consecutively from {section}.0")
                } else {
                    "unrecognised parameter".to_owned()
                };
                return Err(ConfigError::InvalidParameter {
                    name: key.to_owned(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forces.is_empty() {
            return Err(ConfigError::NoForces);
        }
        self.integrator.validate()?;
        for output in &self.outputs {
            output.validate()?;
        }
        Ok(())
    }

    /// Build every component and assemble the orchestrator around `state`.
    pub fn build(&self, state: AtomicState) -> Result<MolecularDynamics, ConfigError> {
        self.validate()?;
        let mut builder = MolecularDynamics::builder(state)
            .integrator(self.integrator.build()?)
            .cell(self.cell.build()?);
        for force in &self.forces {
            let model = force.build(builder.state())?;
            builder = builder.force(model);
        }
        for output in &self.outputs {
            builder = builder.output(output.frequency, output.build()?);
        }
        builder.build()
    }
}
