//! The compiled plan and instruction sinks

use serde::{Deserialize, Serialize};
use xye_core::{Identifier, Instruction};

/// Receives compiled instructions in emission order
///
/// The external artifact emitter implements this to realize instructions
/// as it sees fit; [`BufferSink`] just collects them.
pub trait ArtifactSink {
    fn emit(&mut self, instruction: Instruction);
}

/// A sink that collects instructions into memory
#[derive(Debug, Default)]
pub struct BufferSink {
    instructions: Vec<Instruction>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The instructions received so far, in order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consume the sink, yielding the collected instructions
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl ArtifactSink for BufferSink {
    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }
}

/// The complete, ordered output of one successful compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    device: Identifier,
    instructions: Vec<Instruction>,
}

impl Plan {
    pub(crate) fn new(device: Identifier, instructions: Vec<Instruction>) -> Self {
        Self {
            device,
            instructions,
        }
    }

    /// The device the plan builds
    pub fn device(&self) -> &Identifier {
        &self.device
    }

    /// The instructions in emission order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Feed every instruction to a sink, in order
    pub fn write_to(self, sink: &mut dyn ArtifactSink) {
        for instruction in self.instructions {
            sink.emit(instruction);
        }
    }

    /// Consume the plan, yielding its instructions
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}
