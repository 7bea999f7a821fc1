//! Configuration compiler for XYE-bus climate devices
//!
//! Takes a declarative YAML document describing one air conditioner on the
//! XYE serial bus and compiles it into an ordered sequence of construction
//! instructions for an external artifact emitter. Validation normalizes
//! and cross-checks the whole document up front; generation resolves every
//! entity reference and emits a deterministic [`Plan`].
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # tokio::runtime::Runtime::new()?.block_on(async {
//! use xye_compiler::Compiler;
//!
//! let compiler = Compiler::new();
//! let plan = compiler
//!     .compile_str("supported_modes: [COOL, HEAT]\nbeeper: true")
//!     .await?;
//! assert_eq!(plan.device().as_str(), "air_conditioner_1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # })?;
//! # Ok(())
//! # }
//! ```

mod actions;
mod compiler;
mod error;
mod model;
mod sink;

pub use actions::register_builtin_actions;
pub use compiler::{Compiler, ValidatedConfig};
pub use error::{CompileError, CompileResult, Diagnostics};
pub use model::{default_components, device_schema, sensor_schema};
pub use sink::{ArtifactSink, BufferSink, Plan};

pub use xye_core::Instruction;
pub use xye_schema::ConfigValue;
