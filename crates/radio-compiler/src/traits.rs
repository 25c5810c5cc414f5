//! The compiler seam used by the supervisor.

use crate::error::Result;

/// Converts a flowgraph definition into runnable program text.
///
/// Implementations are stateless: every call starts from the given source
/// and leaves nothing behind on disk. The supervisor stores the returned
/// text itself.
pub trait FlowgraphCompiler: Send + Sync {
    /// Compiles `source` for the program called `program_name`.
    fn compile(&self, program_name: &str, source: &str) -> Result<String>;
}
