//! Pass 2: begin/end block markers.
//!
//! Lines between a begin and an end marker are consumed and wrapped in an
//! async function whose source is registered as a self-invoking expression.
//! The marker lines themselves stay in place, with the three-line
//! registration between them.
//!
//! Blocks do not nest: inside a block a second begin marker is just another
//! body line, and the first end marker closes the block.

use crate::diagnostic::Diagnostic;
use crate::ident::{block_identifier, wrapper_name};
use crate::manifest::{Registration, RegistrationKind};
use crate::markers::{Marker, Markers};
use crate::snippet::{block_expression, block_registration, wrapper_body};

/// Result of the block pass.
pub struct BlockPass {
    pub lines: Vec<String>,
    pub markers: Vec<Marker>,
    pub registrations: Vec<Registration>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of begin markers acted on, terminated or not.
    pub blocks_seen: usize,
}

impl BlockPass {
    pub fn changed(&self) -> bool {
        self.blocks_seen > 0
    }
}

/// Open block state: begin line index and the body collected so far.
struct OpenBlock {
    start_line: usize,
    body: Vec<String>,
}

/// Extract every begin/end block from `lines`.
pub fn extract_blocks(
    lines: &[String],
    resource_path: &str,
    markers: &Markers,
    registry: &str,
) -> BlockPass {
    let mut output = Vec::with_capacity(lines.len());
    let mut found = Vec::new();
    let mut registrations = Vec::new();
    let mut diagnostics = Vec::new();
    let mut open: Option<OpenBlock> = None;
    let mut blocks_seen = 0;

    for (i, line) in lines.iter().enumerate() {
        match open.take() {
            None => {
                if markers.is_begin(line) {
                    blocks_seen += 1;
                    open = Some(OpenBlock {
                        start_line: i,
                        body: Vec::new(),
                    });
                }
                output.push(line.clone());
            }
            Some(block) if markers.is_end(line) => {
                let identifier = block_identifier(resource_path, block.start_line);
                let name = wrapper_name(resource_path, block.start_line, found.len());
                let expression = block_expression(&wrapper_body(&name, &block.body));

                output.extend(block_registration(registry, &identifier, &expression));
                output.push(line.clone());

                registrations.push(Registration {
                    identifier,
                    kind: RegistrationKind::Block,
                    resource_path: resource_path.to_string(),
                    line: block.start_line,
                    source: expression,
                });
                found.push(Marker::Block {
                    start_line: block.start_line,
                    end_line: i,
                    body: block.body,
                });
            }
            Some(mut block) => {
                block.body.push(line.clone());
                open = Some(block);
            }
        }
    }

    if let Some(block) = open {
        diagnostics.push(Diagnostic::UnterminatedBlock {
            resource_path: resource_path.to_string(),
            line: block.start_line,
        });
    }

    BlockPass {
        lines: output,
        markers: found,
        registrations,
        diagnostics,
        blocks_seen,
    }
}
