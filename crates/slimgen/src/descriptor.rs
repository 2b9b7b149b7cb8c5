//! Type Descriptor Table
//!
//! Each binding type is described by a register width and an element type.
//! Everything else (native register token, lane count, intrinsic naming
//! suffix, namespace prefix, public name) is derived from those two, so a
//! descriptor cannot disagree with itself.

use serde::Deserialize;
use std::fmt;

/// Vector register width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u32")]
pub enum RegisterWidth {
    W128,
    W256,
    W512,
}

impl RegisterWidth {
    pub const fn bits(self) -> u32 {
        match self {
            RegisterWidth::W128 => 128,
            RegisterWidth::W256 => 256,
            RegisterWidth::W512 => 512,
        }
    }

    pub const fn bytes(self) -> u32 {
        self.bits() / 8
    }

    /// Intrinsic function namespace for this width
    pub const fn prefix(self) -> &'static str {
        match self {
            RegisterWidth::W128 => "_mm",
            RegisterWidth::W256 => "_mm256",
            RegisterWidth::W512 => "_mm512",
        }
    }

    /// Next narrower width; 128 bits is its own level-down
    pub const fn level_down(self) -> Self {
        match self {
            RegisterWidth::W512 => RegisterWidth::W256,
            RegisterWidth::W256 | RegisterWidth::W128 => RegisterWidth::W128,
        }
    }
}

impl TryFrom<u32> for RegisterWidth {
    type Error = String;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            128 => Ok(RegisterWidth::W128),
            256 => Ok(RegisterWidth::W256),
            512 => Ok(RegisterWidth::W512),
            _ => Err(format!(
                "Unsupported register width {} (expected 128, 256 or 512)",
                bits
            )),
        }
    }
}

/// Register family an element type lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementFamily {
    /// Single precision, `__mNNN`
    Float,
    /// Double precision, `__mNNNd`
    Double,
    /// Any integer lane width, `__mNNNi`
    Integer,
}

impl ElementFamily {
    pub const fn is_floating_point(self) -> bool {
        matches!(self, ElementFamily::Float | ElementFamily::Double)
    }

    const fn register_suffix(self) -> &'static str {
        match self {
            ElementFamily::Float => "",
            ElementFamily::Double => "d",
            ElementFamily::Integer => "i",
        }
    }
}

/// Lane element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ElementType {
    #[serde(rename = "float")]
    F32,
    #[serde(rename = "double")]
    F64,
    #[serde(rename = "int8_t")]
    I8,
    #[serde(rename = "uint8_t")]
    U8,
    #[serde(rename = "int16_t")]
    I16,
    #[serde(rename = "uint16_t")]
    U16,
    #[serde(rename = "int32_t")]
    I32,
    #[serde(rename = "uint32_t")]
    U32,
    #[serde(rename = "int64_t")]
    I64,
    #[serde(rename = "uint64_t")]
    U64,
}

impl ElementType {
    /// C scalar type token
    pub const fn c_type(self) -> &'static str {
        match self {
            ElementType::F32 => "float",
            ElementType::F64 => "double",
            ElementType::I8 => "int8_t",
            ElementType::U8 => "uint8_t",
            ElementType::I16 => "int16_t",
            ElementType::U16 => "uint16_t",
            ElementType::I32 => "int32_t",
            ElementType::U32 => "uint32_t",
            ElementType::I64 => "int64_t",
            ElementType::U64 => "uint64_t",
        }
    }

    pub const fn bytes(self) -> u32 {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::F32 | ElementType::I32 | ElementType::U32 => 4,
            ElementType::F64 | ElementType::I64 | ElementType::U64 => 8,
        }
    }

    pub const fn bits(self) -> u32 {
        self.bytes() * 8
    }

    pub const fn family(self) -> ElementFamily {
        match self {
            ElementType::F32 => ElementFamily::Float,
            ElementType::F64 => ElementFamily::Double,
            _ => ElementFamily::Integer,
        }
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            ElementType::U8 | ElementType::U16 | ElementType::U32 | ElementType::U64
        )
    }

    /// Intrinsic naming suffix. Signedness does not show up here: lane-wise
    /// add/sub/load/store are the same for both.
    pub const fn suffix(self) -> &'static str {
        match self {
            ElementType::F32 => "ps",
            ElementType::F64 => "pd",
            ElementType::I8 | ElementType::U8 => "epi8",
            ElementType::I16 | ElementType::U16 => "epi16",
            ElementType::I32 | ElementType::U32 => "epi32",
            ElementType::I64 | ElementType::U64 => "epi64",
        }
    }

    /// Suffix for signedness-sensitive operations (min/max compare)
    pub const fn ordered_suffix(self) -> &'static str {
        match self {
            ElementType::U8 => "epu8",
            ElementType::U16 => "epu16",
            ElementType::U32 => "epu32",
            ElementType::U64 => "epu64",
            other => other.suffix(),
        }
    }

    /// Human-facing family name used as the public type name stem
    pub const fn family_name(self) -> &'static str {
        match self {
            ElementType::F32 => "FLOAT",
            ElementType::F64 => "DOUBLE",
            ElementType::I8 => "INT8",
            ElementType::U8 => "UINT8",
            ElementType::I16 => "INT16",
            ElementType::U16 => "UINT16",
            ElementType::I32 => "INT32",
            ElementType::U32 => "UINT32",
            ElementType::I64 => "INT64",
            ElementType::U64 => "UINT64",
        }
    }
}

/// A native register type such as `__m256d`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterType {
    pub width: RegisterWidth,
    pub family: ElementFamily,
}

impl RegisterType {
    pub const fn level_down(self) -> Self {
        RegisterType {
            width: self.width.level_down(),
            family: self.family,
        }
    }

    /// The integer register of the same width
    pub const fn as_integer(self) -> Self {
        RegisterType {
            width: self.width,
            family: ElementFamily::Integer,
        }
    }
}

impl fmt::Display for RegisterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__m{}{}", self.width.bits(), self.family.register_suffix())
    }
}

/// One (register width, element type) pair to generate a binding for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct TypeDescriptor {
    pub width: RegisterWidth,
    pub element: ElementType,
}

impl TypeDescriptor {
    pub const fn new(width: RegisterWidth, element: ElementType) -> Self {
        TypeDescriptor { width, element }
    }

    pub const fn register(&self) -> RegisterType {
        RegisterType {
            width: self.width,
            family: self.element.family(),
        }
    }

    pub const fn family(&self) -> ElementFamily {
        self.element.family()
    }

    /// Register bytes divided by element bytes; every width is a multiple
    /// of every element size
    pub const fn lanes(&self) -> u32 {
        self.width.bytes() / self.element.bytes()
    }

    pub const fn prefix(&self) -> &'static str {
        self.width.prefix()
    }

    pub const fn suffix(&self) -> &'static str {
        self.element.suffix()
    }

    /// Public type name, e.g. `FLOATX8`
    pub fn name(&self) -> String {
        format!("{}X{}", self.element.family_name(), self.lanes())
    }

    /// `<prefix>_<op>_<suffix>`
    pub fn entry(&self, op: &str) -> String {
        format!("{}_{}_{}", self.prefix(), op, self.suffix())
    }
}

use ElementType::{F32, F64, I8, I16, I32, I64, U8, U16, U32, U64};
use RegisterWidth::{W128, W256, W512};

/// The default table, in emission order
pub const DEFAULT_DESCRIPTORS: [TypeDescriptor; 30] = [
    TypeDescriptor::new(W128, F32),
    TypeDescriptor::new(W256, F32),
    TypeDescriptor::new(W512, F32),
    TypeDescriptor::new(W128, F64),
    TypeDescriptor::new(W256, F64),
    TypeDescriptor::new(W512, F64),
    TypeDescriptor::new(W128, I8),
    TypeDescriptor::new(W128, U8),
    TypeDescriptor::new(W128, I16),
    TypeDescriptor::new(W128, U16),
    TypeDescriptor::new(W128, I32),
    TypeDescriptor::new(W128, U32),
    TypeDescriptor::new(W128, I64),
    TypeDescriptor::new(W128, U64),
    TypeDescriptor::new(W256, I8),
    TypeDescriptor::new(W256, U8),
    TypeDescriptor::new(W256, I16),
    TypeDescriptor::new(W256, U16),
    TypeDescriptor::new(W256, I32),
    TypeDescriptor::new(W256, U32),
    TypeDescriptor::new(W256, I64),
    TypeDescriptor::new(W256, U64),
    TypeDescriptor::new(W512, I8),
    TypeDescriptor::new(W512, U8),
    TypeDescriptor::new(W512, I16),
    TypeDescriptor::new(W512, U16),
    TypeDescriptor::new(W512, I32),
    TypeDescriptor::new(W512, U32),
    TypeDescriptor::new(W512, I64),
    TypeDescriptor::new(W512, U64),
];
