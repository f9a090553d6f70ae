use std::fmt;

/// Programmable pipeline stage a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure reported by one of the initialization steps.
///
/// Hosts report these through return values; the runner decides what each
/// one means for the rest of the sequence (see [`InitError::is_fatal`]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("failed to initialize the windowing subsystem: {0}")]
    WindowSystem(String),

    #[error("failed to create window: {0}")]
    WindowCreation(String),

    #[error("failed to initialize the graphics loader: {0}")]
    GraphicsLoader(String),

    #[error("{stage} shader compilation failed:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program linking failed:\n{log}")]
    ProgramLink { log: String },
}

impl InitError {
    /// Returns `true` when the sequence cannot continue past this error.
    ///
    /// Missing window, context, or device is fatal. A broken shader program
    /// is not: the loop still runs and the draw simply produces nothing.
    pub fn is_fatal(&self) -> bool {
        match self {
            InitError::WindowSystem(_)
            | InitError::WindowCreation(_)
            | InitError::GraphicsLoader(_) => true,
            InitError::ShaderCompile { .. } | InitError::ProgramLink { .. } => false,
        }
    }
}
