//! Type Binding Synthesis
//!
//! Turns the frozen catalog and the descriptor table into Generated Units:
//!
//! 1. one struct per descriptor, in table order ([`methods`])
//! 2. elementwise free functions ([`functions`])
//! 3. the capability constraint
//! 4. generic algorithms over the constraint
//!
//! Every operation is availability-gated: a member or function is emitted
//! only when its entry point is in the catalog, or when a documented
//! fallback routes it through a member that is. Nothing here fails; gaps
//! in the catalog just mean smaller types.

pub mod functions;
pub mod methods;
pub mod operation;

pub use functions::{CAPABILITY_NAME, FREE_OPERATIONS, FreeOp};
pub use methods::synthesize_type;
pub use operation::{ArithOp, EntryForm, EntryPoint, METHOD_OPERATIONS, Operation, Resolution};

use crate::catalog::SymbolCatalog;
use crate::descriptor::TypeDescriptor;
use crate::unit::Unit;
use tracing::info;

pub struct Synthesizer<'a> {
    catalog: &'a SymbolCatalog,
    descriptors: &'a [TypeDescriptor],
}

impl<'a> Synthesizer<'a> {
    pub fn new(catalog: &'a SymbolCatalog, descriptors: &'a [TypeDescriptor]) -> Self {
        Synthesizer {
            catalog,
            descriptors,
        }
    }

    /// All units in output order
    pub fn synthesize(&self) -> Vec<Unit> {
        let mut units: Vec<Unit> = self
            .descriptors
            .iter()
            .map(|desc| Unit::Struct(synthesize_type(desc, self.catalog)))
            .collect();

        units.extend(
            functions::synthesize_free_functions(self.descriptors, self.catalog)
                .into_iter()
                .map(Unit::Function),
        );
        units.push(Unit::Constraint(functions::capability_constraint(
            self.descriptors,
        )));
        units.extend(functions::generic_algorithms().into_iter().map(Unit::Generic));

        info!(
            "Synthesized {} units for {} types",
            units.len(),
            self.descriptors.len()
        );
        units
    }
}
