//! The molecular-dynamics orchestrator.
//!
//! [`MolecularDynamics`] owns every component of a run and drives the
//! integrator for a fixed number of steps, handing a [`Frame`] to each
//! writer whose frequency divides the step count.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use kinetic_cell::Cell;
use kinetic_core::{AtomicState, StateError};
use kinetic_force::{Force, ForceError, Forces};
use kinetic_integrate::{temperature, Integrate, IntegrateError};

use crate::config::ConfigError;
use crate::metrics::StepMetrics;
use crate::writer::{Frame, WriteError, Writer};

// Compile-time assertion: MolecularDynamics is Send (can move to a worker thread).
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<MolecularDynamics>();
    }
};

// ── RunError ───────────────────────────────────────────────────────

/// Errors raised while a run is in progress.
#[derive(Debug)]
pub enum RunError {
    /// The initial force evaluation failed.
    Force(ForceError),
    /// A step failed.
    Integrate(IntegrateError),
    /// Post-step bookkeeping could not read the state.
    State(StateError),
    /// A writer failed.
    Write {
        /// The writer's name.
        writer: String,
        /// The underlying failure.
        source: WriteError,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Force(e) => write!(f, "initial force evaluation failed: {e}"),
            Self::Integrate(e) => write!(f, "step failed: {e}"),
            Self::State(e) => write!(f, "state: {e}"),
            Self::Write { writer, source } => write!(f, "writer '{writer}' failed: {source}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Force(e) => Some(e),
            Self::Integrate(e) => Some(e),
            Self::State(e) => Some(e),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<ForceError> for RunError {
    fn from(e: ForceError) -> Self {
        Self::Force(e)
    }
}

impl From<IntegrateError> for RunError {
    fn from(e: IntegrateError) -> Self {
        Self::Integrate(e)
    }
}

impl From<StateError> for RunError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

// ── MolecularDynamics ──────────────────────────────────────────────

struct OutputSlot {
    frequency: u64,
    writer: Box<dyn Writer>,
}

/// A complete molecular-dynamics simulation.
///
/// Built with [`MolecularDynamics::builder`]; the builder calls the
/// integrator's `initialise()` exactly once. [`run()`](Self::run) then
/// takes steps until the integrator's `num_steps` is reached.
///
/// # Examples
///
/// ```
/// use kinetic_cell::UnboundedCell;
/// use kinetic_core::{AtomType, AtomicState, Tensor};
/// use kinetic_engine::MolecularDynamics;
/// use kinetic_forces::LennardJones;
/// use kinetic_integrate::VelocityVerlet;
/// use std::sync::Arc;
///
/// let ar = Arc::new(AtomType::builder("Ar").build().unwrap());
/// let positions = Tensor::from_vec(vec![0.0, 0.0, 0.0, 4.0, 0.0, 0.0], [2, 3]).unwrap();
/// let mut state = AtomicState::new_dynamic();
/// state.add(vec![ar.clone(), ar], positions, None, None).unwrap();
///
/// let lj = LennardJones::for_state(&state).unwrap();
/// let mut md = MolecularDynamics::builder(state)
///     .cell(Box::new(UnboundedCell::new()))
///     .force(Box::new(lj))
///     .integrator(Box::new(VelocityVerlet::new(1.0, 10).unwrap()))
///     .build()
///     .unwrap();
/// md.run().unwrap();
/// assert_eq!(md.current_step(), 10);
/// ```
pub struct MolecularDynamics {
    state: AtomicState,
    cell: Box<dyn Cell>,
    forces: Forces,
    integrator: Box<dyn Integrate>,
    outputs: Vec<OutputSlot>,
    potential_energy: f64,
    forces_ready: bool,
    last_metrics: StepMetrics,
}

impl MolecularDynamics {
    /// Start assembling a simulation of `state`.
    pub fn builder(state: AtomicState) -> MolecularDynamicsBuilder {
        MolecularDynamicsBuilder {
            state,
            cell: None,
            forces: Forces::new(),
            integrator: None,
            outputs: Vec::new(),
        }
    }

    /// Run until the integrator has taken `num_steps` steps, then flush
    /// every writer.
    ///
    /// Forces for the initial positions are evaluated before the loop, so
    /// a zero-step run still leaves forces and potential energy current.
    /// Calling `run()` again after completion takes no further steps.
    pub fn run(&mut self) -> Result<(), RunError> {
        let num_steps = self.integrator.num_steps();
        self.prepare_forces()?;
        log::info!(
            "Starting molecular dynamics: {} atom(s), {} step(s) of {} fs with {}",
            self.state.num_atoms(None),
            num_steps,
            self.integrator.dt(),
            self.integrator.name()
        );
        let start = Instant::now();
        while self.integrator.current_step() < num_steps {
            self.step()?;
        }
        for slot in &mut self.outputs {
            slot.writer.flush().map_err(|source| RunError::Write {
                writer: slot.writer.name().to_owned(),
                source,
            })?;
            log::debug!("Flushed {} writer", slot.writer.name());
        }
        log::info!(
            "Finished molecular dynamics after {} step(s) in {:.3} s",
            self.integrator.current_step(),
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Take a single step and dispatch due writers.
    ///
    /// Forces for the initial positions are evaluated before the first
    /// step. This does not check `num_steps`; [`run()`](Self::run) does.
    pub fn step(&mut self) -> Result<&StepMetrics, RunError> {
        let step_start = Instant::now();
        self.prepare_forces()?;

        let integrate_start = Instant::now();
        self.potential_energy =
            self.integrator
                .step(&mut self.state, &self.forces, self.cell.as_ref())?;
        let integrate_us = integrate_start.elapsed().as_micros() as u64;

        let step = self.integrator.current_step();
        let output_start = Instant::now();
        let frame = Frame {
            state: &self.state,
            step,
            dt: self.integrator.dt(),
            potential_energy: self.potential_energy,
        };
        let comment = format!("Step {step}");
        let mut writers_fired = 0;
        for slot in self.outputs.iter_mut().filter(|s| step % s.frequency == 0) {
            slot.writer
                .write(&frame, Some(&comment))
                .map_err(|source| RunError::Write {
                    writer: slot.writer.name().to_owned(),
                    source,
                })?;
            writers_fired += 1;
        }
        let output_us = output_start.elapsed().as_micros() as u64;

        self.last_metrics = StepMetrics {
            step,
            total_us: step_start.elapsed().as_micros() as u64,
            integrate_us,
            output_us,
            writers_fired,
            potential_energy: self.potential_energy,
            kinetic_energy: self.state.kinetic(None)?,
            temperature: temperature(&self.state)?,
        };
        Ok(&self.last_metrics)
    }

    fn prepare_forces(&mut self) -> Result<(), RunError> {
        if !self.forces_ready {
            self.potential_energy = self.forces.evaluate(&mut self.state, self.cell.as_ref())?;
            self.forces_ready = true;
        }
        Ok(())
    }

    /// The simulated state.
    pub fn state(&self) -> &AtomicState {
        &self.state
    }

    /// Consume the simulation and return its state.
    pub fn into_state(self) -> AtomicState {
        self.state
    }

    /// The simulation cell.
    pub fn cell(&self) -> &dyn Cell {
        self.cell.as_ref()
    }

    /// The force composite.
    pub fn forces(&self) -> &Forces {
        &self.forces
    }

    /// The integrator.
    pub fn integrator(&self) -> &dyn Integrate {
        self.integrator.as_ref()
    }

    /// Steps taken so far.
    pub fn current_step(&self) -> u64 {
        self.integrator.current_step()
    }

    /// Potential energy from the most recent force evaluation (0 before
    /// the first step).
    pub fn potential_energy(&self) -> f64 {
        self.potential_energy
    }

    /// Metrics from the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}

impl fmt::Debug for MolecularDynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MolecularDynamics")
            .field("num_atoms", &self.state.num_atoms(None))
            .field("cell", &self.cell.name())
            .field("forces", &self.forces)
            .field("integrator", &self.integrator.name())
            .field("current_step", &self.integrator.current_step())
            .field("num_steps", &self.integrator.num_steps())
            .field("writers", &self.outputs.len())
            .finish()
    }
}

// ── MolecularDynamicsBuilder ───────────────────────────────────────

/// Builder for [`MolecularDynamics`].
///
/// Required: a cell, an integrator and at least one force.
pub struct MolecularDynamicsBuilder {
    state: AtomicState,
    cell: Option<Box<dyn Cell>>,
    forces: Forces,
    integrator: Option<Box<dyn Integrate>>,
    outputs: Vec<OutputSlot>,
}

impl MolecularDynamicsBuilder {
    /// The state being assembled around, for building state-dependent
    /// components such as force models.
    pub fn state(&self) -> &AtomicState {
        &self.state
    }

    /// Set the simulation cell.
    pub fn cell(mut self, cell: Box<dyn Cell>) -> Self {
        self.cell = Some(cell);
        self
    }

    /// Add a force model. Models are summed in insertion order.
    pub fn force(mut self, force: Box<dyn Force>) -> Self {
        self.forces.add(force);
        self
    }

    /// Set the integrator.
    pub fn integrator(mut self, integrator: Box<dyn Integrate>) -> Self {
        self.integrator = Some(integrator);
        self
    }

    /// Add a writer invoked every `frequency` steps.
    pub fn output(mut self, frequency: u64, writer: Box<dyn Writer>) -> Self {
        self.outputs.push(OutputSlot { frequency, writer });
        self
    }

    /// Validate, initialise the state through the integrator, and build.
    pub fn build(self) -> Result<MolecularDynamics, ConfigError> {
        let Self {
            mut state,
            cell,
            forces,
            integrator,
            outputs,
        } = self;
        if !state.is_dynamic() {
            return Err(ConfigError::StaticState);
        }
        let cell = cell.ok_or(ConfigError::MissingCell)?;
        let mut integrator = integrator.ok_or(ConfigError::MissingIntegrator)?;
        if forces.is_empty() {
            return Err(ConfigError::NoForces);
        }
        if let Some(slot) = outputs.iter().find(|s| s.frequency == 0) {
            return Err(ConfigError::ZeroFrequency {
                writer: slot.writer.name().to_owned(),
            });
        }

        integrator.initialise(&mut state)?;
        log::info!(
            "Assembled molecular dynamics: cell {}, forces {:?}, integrator {}, {} writer(s)",
            cell.name(),
            forces.names(),
            integrator.name(),
            outputs.len()
        );
        Ok(MolecularDynamics {
            state,
            cell,
            forces,
            integrator,
            outputs,
            potential_energy: 0.0,
            forces_ready: false,
            last_metrics: StepMetrics::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_cell::UnboundedCell;
    use kinetic_forces::LennardJones;
    use kinetic_integrate::{Evans, VelocityVerlet};
    use kinetic_test_utils::fixtures::{argon_box, argon_dimer};
    use kinetic_test_utils::{CountingForce, FailingForce};
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(u64, Option<String>)>>>;

    struct RecordingWriter {
        name: &'static str,
        log: Log,
        fail: bool,
    }

    impl RecordingWriter {
        fn new(name: &'static str) -> (Self, Log) {
            let log = Log::default();
            let writer = Self {
                name,
                log: log.clone(),
                fail: false,
            };
            (writer, log)
        }
    }

    impl Writer for RecordingWriter {
        fn name(&self) -> &str {
            self.name
        }

        fn write(&mut self, frame: &Frame<'_>, comment: Option<&str>) -> Result<(), WriteError> {
            if self.fail {
                return Err(WriteError::Io(std::io::Error::other("refused")));
            }
            self.log
                .lock()
                .unwrap()
                .push((frame.step, comment.map(str::to_owned)));
            Ok(())
        }
    }

    fn counting_md(num_steps: u64) -> (MolecularDynamics, Arc<std::sync::atomic::AtomicUsize>) {
        let force = CountingForce::new();
        let calls = force.counter();
        let md = MolecularDynamics::builder(argon_dimer())
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(force))
            .integrator(Box::new(VelocityVerlet::new(1.0, num_steps).unwrap()))
            .build()
            .unwrap();
        (md, calls)
    }

    // ── Builder ─────────────────────────────────────────────────

    #[test]
    fn builder_requires_components() {
        let vv = || Box::new(VelocityVerlet::new(1.0, 1).unwrap());
        let cell = || Box::new(UnboundedCell::new());
        let force = || Box::new(CountingForce::new());

        let r = MolecularDynamics::builder(argon_dimer())
            .force(force())
            .integrator(vv())
            .build();
        assert!(matches!(r, Err(ConfigError::MissingCell)));

        let r = MolecularDynamics::builder(argon_dimer())
            .cell(cell())
            .force(force())
            .build();
        assert!(matches!(r, Err(ConfigError::MissingIntegrator)));

        let r = MolecularDynamics::builder(argon_dimer())
            .cell(cell())
            .integrator(vv())
            .build();
        assert!(matches!(r, Err(ConfigError::NoForces)));

        let (writer, _) = RecordingWriter::new("recorder");
        let r = MolecularDynamics::builder(argon_dimer())
            .cell(cell())
            .force(force())
            .integrator(vv())
            .output(0, Box::new(writer))
            .build();
        assert!(matches!(r, Err(ConfigError::ZeroFrequency { writer }) if writer == "recorder"));
    }

    #[test]
    fn builder_rejects_static_state() {
        let mut state = AtomicState::new_static();
        state
            .add(Vec::new(), kinetic_core::Tensor::new([0, 3]), None, None)
            .unwrap();
        let r = MolecularDynamics::builder(state)
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(CountingForce::new()))
            .integrator(Box::new(VelocityVerlet::new(1.0, 1).unwrap()))
            .build();
        assert!(matches!(r, Err(ConfigError::StaticState)));
    }

    #[test]
    fn build_initialises_through_thermostat() {
        let (state, cell) = argon_box(3, 1.0, 9);
        let lj = LennardJones::for_state(&state).unwrap();
        let vv = VelocityVerlet::builder()
            .timestep(1.0)
            .num_steps(1)
            .thermostat(Box::new(Evans::new(250.0).unwrap()))
            .build()
            .unwrap();
        let md = MolecularDynamics::builder(state)
            .cell(Box::new(cell))
            .force(Box::new(lj))
            .integrator(Box::new(vv))
            .build()
            .unwrap();
        assert!((temperature(md.state()).unwrap() - 250.0).abs() < 1e-8);
        assert_eq!(md.current_step(), 0);
    }

    // ── Run loop ────────────────────────────────────────────────

    #[test]
    fn run_takes_exactly_num_steps() {
        let (mut md, calls) = counting_md(12);
        md.run().unwrap();
        assert_eq!(md.current_step(), 12);
        // one initial evaluation plus one per step
        assert_eq!(calls.load(Ordering::Relaxed), 13);

        md.run().unwrap();
        assert_eq!(md.current_step(), 12);
        assert_eq!(calls.load(Ordering::Relaxed), 13);
    }

    #[test]
    fn zero_steps_evaluates_initial_forces_once() {
        let (mut md, calls) = counting_md(0);
        md.run().unwrap();
        assert_eq!(md.current_step(), 0);
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        md.run().unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn zero_step_run_leaves_forces_current() {
        let mut state = argon_dimer();
        state.pos_mut(0)[0] += 0.3;
        let lj = LennardJones::for_state(&state).unwrap();
        let mut md = MolecularDynamics::builder(state)
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(lj))
            .integrator(Box::new(VelocityVerlet::new(1.0, 0).unwrap()))
            .build()
            .unwrap();
        md.run().unwrap();
        assert!(md.potential_energy() < 0.0);
        let f0 = md.state().force(0).unwrap();
        let f1 = md.state().force(1).unwrap();
        assert!(f0[0].abs() > 0.0, "force {f0:?}");
        assert!((f0[0] + f1[0]).abs() < 1e-12 * f0[0].abs().max(1.0));
    }

    #[test]
    fn writers_fire_on_multiples_of_frequency() {
        let (every_three, log3) = RecordingWriter::new("three");
        let (every_step, log1) = RecordingWriter::new("one");
        let mut md = MolecularDynamics::builder(argon_dimer())
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(CountingForce::new()))
            .integrator(Box::new(VelocityVerlet::new(1.0, 10).unwrap()))
            .output(3, Box::new(every_three))
            .output(1, Box::new(every_step))
            .build()
            .unwrap();
        md.run().unwrap();

        let log3 = log3.lock().unwrap();
        let steps: Vec<u64> = log3.iter().map(|(s, _)| *s).collect();
        assert_eq!(steps, [3, 6, 9]);
        assert_eq!(log3[0].1.as_deref(), Some("Step 3"));
        assert_eq!(log1.lock().unwrap().len(), 10);
        assert_eq!(md.last_metrics().writers_fired, 1);
    }

    #[test]
    fn step_reports_metrics() {
        let mut state = argon_dimer();
        state.pos_mut(0)[0] += 0.2;
        let lj = LennardJones::for_state(&state).unwrap();
        let mut md = MolecularDynamics::builder(state)
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(lj))
            .integrator(Box::new(VelocityVerlet::new(1.0, 5).unwrap()))
            .build()
            .unwrap();
        let metrics = md.step().unwrap().clone();
        assert_eq!(metrics.step, 1);
        assert!(metrics.potential_energy < 0.0);
        assert!(metrics.kinetic_energy > 0.0);
        assert!(metrics.temperature > 0.0);
        assert_eq!(metrics.potential_energy, md.potential_energy());
        assert!(metrics.total_us >= metrics.integrate_us);
    }

    #[test]
    fn displaced_dimer_conserves_energy() {
        let mut state = argon_dimer();
        state.pos_mut(0)[0] += 0.1;
        let lj = LennardJones::for_state(&state).unwrap();
        let mut md = MolecularDynamics::builder(state)
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(lj))
            .integrator(Box::new(VelocityVerlet::new(0.5, 400).unwrap()))
            .build()
            .unwrap();
        let e0 = md.step().unwrap().total_energy();
        md.run().unwrap();
        let e1 = md.last_metrics().total_energy();
        assert!(((e1 - e0) / e0).abs() < 1e-4, "energy {e0} -> {e1}");
    }

    // ── Failures ────────────────────────────────────────────────

    #[test]
    fn force_failure_stops_run() {
        let mut md = MolecularDynamics::builder(argon_dimer())
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(FailingForce::new(2)))
            .integrator(Box::new(VelocityVerlet::new(1.0, 10).unwrap()))
            .build()
            .unwrap();
        let err = md.run().unwrap_err();
        assert!(matches!(
            err,
            RunError::Integrate(IntegrateError::Force(ForceError::CoincidentAtoms { .. }))
        ));
        assert_eq!(md.current_step(), 1);
    }

    #[test]
    fn initial_force_failure_is_reported() {
        let mut md = MolecularDynamics::builder(argon_dimer())
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(FailingForce::new(0)))
            .integrator(Box::new(VelocityVerlet::new(1.0, 10).unwrap()))
            .build()
            .unwrap();
        assert!(matches!(md.run(), Err(RunError::Force(_))));
        assert_eq!(md.current_step(), 0);
    }

    #[test]
    fn writer_failure_names_writer() {
        let (mut writer, _) = RecordingWriter::new("broken");
        writer.fail = true;
        let mut md = MolecularDynamics::builder(argon_dimer())
            .cell(Box::new(UnboundedCell::new()))
            .force(Box::new(CountingForce::new()))
            .integrator(Box::new(VelocityVerlet::new(1.0, 10).unwrap()))
            .output(2, Box::new(writer))
            .build()
            .unwrap();
        match md.run() {
            Err(RunError::Write { writer, source }) => {
                assert_eq!(writer, "broken");
                assert!(matches!(source, WriteError::Io(_)));
            }
            other => panic!("expected a write error, got {other:?}"),
        }
        assert_eq!(md.current_step(), 2);
    }

    #[test]
    fn debug_lists_components() {
        let (md, _) = counting_md(3);
        let text = format!("{md:?}");
        assert!(text.contains("Unbounded"));
        assert!(text.contains("VelocityVerlet"));
        assert!(text.contains("counting"));
    }
}
