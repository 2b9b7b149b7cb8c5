//! Operation specs for binding-type members.
//!
//! Each [`Operation`] knows which descriptors it is attempted for, which
//! entry-point names can implement it (in preference order), and which
//! other operation it may be routed through when none of them exist.

use crate::catalog::SymbolCatalog;
use crate::descriptor::{ElementFamily, ElementType, RegisterWidth, TypeDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub const fn token(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// Mnemonic for `desc`. Multiply keeps only the low half of each
    /// product for 16- and 32-bit integer lanes.
    pub fn mnemonic(self, desc: &TypeDescriptor) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => {
                if desc.family() == ElementFamily::Integer && matches!(desc.element.bits(), 16 | 32)
                {
                    "mullo"
                } else {
                    "mul"
                }
            }
            ArithOp::Div => "div",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DefaultConstructor,
    FromRegister,
    /// Broadcast one scalar to every lane (`set1`)
    Broadcast,
    /// One scalar per lane (`set`)
    PerLane,
    Arithmetic(ArithOp),
    MutableAccessor,
    ConstAccessor,
    Load,
    Store,
    LoadUnaligned,
    StoreUnaligned,
    /// 16-bit lanes to 8-bit lanes in the level-down register
    NarrowToBytes,
    /// Floating-point lanes to 32-bit integers, current rounding mode
    RoundToInt32,
    FusedMultiplyAdd,
    Shuffle,
    Round,
    Floor,
    Ceil,
}

/// All member operations in emission order
pub const METHOD_OPERATIONS: [Operation; 21] = [
    Operation::DefaultConstructor,
    Operation::FromRegister,
    Operation::Broadcast,
    Operation::PerLane,
    Operation::Arithmetic(ArithOp::Add),
    Operation::Arithmetic(ArithOp::Mul),
    Operation::Arithmetic(ArithOp::Sub),
    Operation::Arithmetic(ArithOp::Div),
    Operation::MutableAccessor,
    Operation::ConstAccessor,
    Operation::Load,
    Operation::Store,
    Operation::LoadUnaligned,
    Operation::StoreUnaligned,
    Operation::NarrowToBytes,
    Operation::RoundToInt32,
    Operation::FusedMultiplyAdd,
    Operation::Shuffle,
    Operation::Round,
    Operation::Floor,
    Operation::Ceil,
];

/// How an entry point takes its memory operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryForm {
    /// Element-typed, or no memory operand at all
    Lane,
    /// Whole-register mnemonic (`_siNNN`) taking a register pointer
    WholeRegister,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: String,
    pub form: EntryForm,
}

impl EntryPoint {
    fn lane(name: String) -> Self {
        EntryPoint {
            name,
            form: EntryForm::Lane,
        }
    }

    fn whole_register(name: String) -> Self {
        EntryPoint {
            name,
            form: EntryForm::WholeRegister,
        }
    }
}

/// Outcome of probing the catalog for one (descriptor, operation) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Needs no entry point
    Always,
    /// Call through to this entry point
    Direct(EntryPoint),
    /// Route through another member that resolved directly
    Fallback(Operation),
    /// Not available on this platform snapshot
    Absent,
}

impl Operation {
    /// Type-restriction predicate
    pub fn applies_to(self, desc: &TypeDescriptor) -> bool {
        match self {
            Operation::NarrowToBytes => {
                desc.family() == ElementFamily::Integer && desc.element.bits() == 16
            }
            Operation::RoundToInt32
            | Operation::FusedMultiplyAdd
            | Operation::Shuffle
            | Operation::Round
            | Operation::Floor
            | Operation::Ceil => desc.family().is_floating_point(),
            _ => true,
        }
    }

    /// Operation this one may be routed through when it has no entry point
    pub fn fallback(self) -> Option<Operation> {
        match self {
            Operation::Load => Some(Operation::LoadUnaligned),
            Operation::Store => Some(Operation::StoreUnaligned),
            Operation::StoreUnaligned => Some(Operation::Store),
            Operation::Floor | Operation::Ceil => Some(Operation::Round),
            _ => None,
        }
    }

    /// Candidate entry points in preference order. Empty means the
    /// operation needs none.
    pub fn candidates(self, desc: &TypeDescriptor) -> Vec<EntryPoint> {
        match self {
            Operation::DefaultConstructor
            | Operation::FromRegister
            | Operation::MutableAccessor
            | Operation::ConstAccessor => Vec::new(),
            Operation::Broadcast => vec![EntryPoint::lane(construct_entry(desc, "set1"))],
            Operation::PerLane => vec![EntryPoint::lane(construct_entry(desc, "set"))],
            Operation::Arithmetic(arith) => {
                vec![EntryPoint::lane(desc.entry(arith.mnemonic(desc)))]
            }
            Operation::Load => memory_entries(desc, "load"),
            Operation::Store => memory_entries(desc, "store"),
            Operation::LoadUnaligned => memory_entries(desc, "loadu"),
            Operation::StoreUnaligned => memory_entries(desc, "storeu"),
            Operation::NarrowToBytes => {
                vec![EntryPoint::lane(format!("{}_cvtepi16_epi8", desc.prefix()))]
            }
            Operation::RoundToInt32 => vec![EntryPoint::lane(format!(
                "{}_cvt{}_epi32",
                desc.prefix(),
                desc.suffix()
            ))],
            Operation::FusedMultiplyAdd => vec![EntryPoint::lane(desc.entry("fmadd"))],
            Operation::Shuffle => vec![EntryPoint::lane(desc.entry("shuffle"))],
            Operation::Round => vec![
                EntryPoint::lane(desc.entry("round")),
                EntryPoint::lane(desc.entry("roundscale")),
            ],
            Operation::Floor => vec![EntryPoint::lane(desc.entry("floor"))],
            Operation::Ceil => vec![EntryPoint::lane(desc.entry("ceil"))],
        }
    }

    /// First candidate present in the catalog
    pub fn resolve_direct(self, desc: &TypeDescriptor, catalog: &SymbolCatalog) -> Option<EntryPoint> {
        self.candidates(desc)
            .into_iter()
            .find(|ep| catalog.present(&ep.name))
    }

    /// Decide how (or whether) this operation is emitted for `desc`.
    ///
    /// A fallback is only taken when the operation it routes through
    /// resolves directly, so fallbacks never chain and never point at a
    /// member that was not emitted.
    pub fn resolve(self, desc: &TypeDescriptor, catalog: &SymbolCatalog) -> Resolution {
        if self.candidates(desc).is_empty() {
            return Resolution::Always;
        }
        if let Some(ep) = self.resolve_direct(desc, catalog) {
            return Resolution::Direct(ep);
        }
        if let Some(via) = self.fallback()
            && via.applies_to(desc)
            && via.resolve_direct(desc, catalog).is_some()
        {
            return Resolution::Fallback(via);
        }
        Resolution::Absent
    }
}

/// `set`/`set1` take an extra `x` for 64-bit integer lanes below 512 bits
fn construct_entry(desc: &TypeDescriptor, op: &str) -> String {
    let entry = desc.entry(op);
    if desc.width != RegisterWidth::W512 && matches!(desc.element, ElementType::I64 | ElementType::U64)
    {
        entry + "x"
    } else {
        entry
    }
}

/// Integer registers also load/store through the `_siNNN` mnemonics
fn memory_entries(desc: &TypeDescriptor, op: &str) -> Vec<EntryPoint> {
    let mut entries = vec![EntryPoint::lane(desc.entry(op))];
    if desc.family() == ElementFamily::Integer {
        entries.push(EntryPoint::whole_register(format!(
            "{}_{}_si{}",
            desc.prefix(),
            op,
            desc.width.bits()
        )));
    }
    entries
}
