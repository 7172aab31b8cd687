//! Periodic output of simulation frames.
//!
//! A [`Writer`] receives a [`Frame`] every time its output frequency
//! divides the step count. Both bundled writers are generic over
//! `W: Write` so tests can use `Vec<u8>` and production code can use
//! `BufWriter<File>`.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use kinetic_core::{AtomicState, StateError};
use kinetic_integrate::{temperature, IntegrateError};

/// Column width of the thermodynamics table.
const COLUMN_WIDTH: usize = 20;

// ── WriteError ─────────────────────────────────────────────────────

/// Errors raised while writing output.
#[derive(Debug)]
pub enum WriteError {
    /// The underlying sink failed.
    Io(io::Error),
    /// The frame's state lacks a buffer the writer needs.
    State(StateError),
    /// A derived quantity (e.g. temperature) could not be computed.
    Integrate(IntegrateError),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::State(e) => write!(f, "state: {e}"),
            Self::Integrate(e) => write!(f, "{e}"),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::State(e) => Some(e),
            Self::Integrate(e) => Some(e),
        }
    }
}

impl From<io::Error> for WriteError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StateError> for WriteError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

impl From<IntegrateError> for WriteError {
    fn from(e: IntegrateError) -> Self {
        Self::Integrate(e)
    }
}

// ── Frame ──────────────────────────────────────────────────────────

/// Read-only view of the simulation handed to writers.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// The state after the step.
    pub state: &'a AtomicState,
    /// Steps completed so far (1-based after the first step).
    pub step: u64,
    /// Integrator timestep, fs.
    pub dt: f64,
    /// Potential energy at the current positions.
    pub potential_energy: f64,
}

// ── Writer ─────────────────────────────────────────────────────────

/// A periodic output sink.
///
/// # Object safety
///
/// This trait is object-safe; the orchestrator stores writers as
/// `Box<dyn Writer>`.
pub trait Writer: Send + 'static {
    /// Human-readable name, used in logs and errors.
    fn name(&self) -> &str;

    /// Record one frame, with an optional free-text comment.
    fn write(&mut self, frame: &Frame<'_>, comment: Option<&str>) -> Result<(), WriteError>;

    /// Flush buffered output. Called once when a run finishes.
    fn flush(&mut self) -> Result<(), WriteError> {
        Ok(())
    }
}

// ── XyzWriter ──────────────────────────────────────────────────────

/// Trajectory writer for the `.xyz` format.
///
/// Each frame is a count line, a comment line, then one
/// `id<TAB>x<TAB>y<TAB>z` row per atom in fixed notation.
///
/// # Examples
///
/// ```
/// use kinetic_core::{AtomType, AtomicState, Tensor};
/// use kinetic_engine::{Frame, Writer, XyzWriter};
/// use std::sync::Arc;
///
/// let ar = Arc::new(AtomType::builder("Ar").build().unwrap());
/// let mut state = AtomicState::new_dynamic();
/// state.add(vec![ar], Tensor::new([1, 3]), None, None).unwrap();
///
/// let mut writer = XyzWriter::new(Vec::new());
/// let frame = Frame { state: &state, step: 1, dt: 1.0, potential_energy: 0.0 };
/// writer.write(&frame, Some("Step 1")).unwrap();
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(text, "1\nStep 1\nAr\t0.000000\t0.000000\t0.000000\n");
/// ```
pub struct XyzWriter<W: Write> {
    out: W,
    frames_written: u64,
}

impl XyzWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path` and write frames to it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> XyzWriter<W> {
    /// Write frames to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            frames_written: 0,
        }
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> Writer for XyzWriter<W> {
    fn name(&self) -> &str {
        "xyz"
    }

    fn write(&mut self, frame: &Frame<'_>, comment: Option<&str>) -> Result<(), WriteError> {
        let state = frame.state;
        writeln!(self.out, "{}", state.num_atoms(None))?;
        writeln!(self.out, "{}", comment.unwrap_or_default())?;
        for i in 0..state.num_atoms(None) {
            let r = state.pos(i);
            writeln!(
                self.out,
                "{}\t{:.6}\t{:.6}\t{:.6}",
                state.atom_type(i).id(),
                r[0],
                r[1],
                r[2]
            )?;
        }
        self.frames_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriteError> {
        self.out.flush()?;
        Ok(())
    }
}

// ── ThermodynamicsWriter ───────────────────────────────────────────

/// Tabulates step, temperature, potential and kinetic energy.
///
/// A header row is written on construction. Columns are left-aligned in
/// fixed-width fields; energies are in internal units (Da·Å²/fs²) and
/// printed in scientific notation.
pub struct ThermodynamicsWriter<W: Write> {
    out: W,
}

impl ThermodynamicsWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path` and write the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> ThermodynamicsWriter<W> {
    /// Write the header to `out`.
    pub fn new(mut out: W) -> Result<Self, WriteError> {
        writeln!(
            out,
            "{:<w$}{:<w$}{:<w$}{:<w$}",
            "Step",
            "Temperature / K",
            "Potential",
            "Kinetic",
            w = COLUMN_WIDTH
        )?;
        Ok(Self { out })
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> Writer for ThermodynamicsWriter<W> {
    fn name(&self) -> &str {
        "thermodynamics"
    }

    fn write(&mut self, frame: &Frame<'_>, _comment: Option<&str>) -> Result<(), WriteError> {
        let kinetic = frame.state.kinetic(None)?;
        let temperature = temperature(frame.state)?;
        writeln!(
            self.out,
            "{:<w$}{:<w$.6}{:<w$.6e}{:<w$.6e}",
            frame.step,
            temperature,
            frame.potential_energy,
            kinetic,
            w = COLUMN_WIDTH
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriteError> {
        self.out.flush()?;
        Ok(())
    }
}
