//! Non-member units: elementwise free functions, the capability
//! constraint, and generic algorithms over it.

use crate::catalog::SymbolCatalog;
use crate::descriptor::TypeDescriptor;
use crate::unit::{CapabilityConstraint, Expr, FreeFunction, GenericAlgorithm, Param, Stmt};
use tracing::debug;

/// Name of the generated capability constraint
pub const CAPABILITY_NAME: &str = "IntrinsicType";

const ARG_NAMES: [&str; 3] = ["a", "b", "c"];

/// Elementwise free function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreeOp {
    Max,
    Min,
    Pow,
    Sin,
    Cos,
    Asin,
    Acos,
}

/// Per-type emission order
pub const FREE_OPERATIONS: [FreeOp; 7] = [
    FreeOp::Max,
    FreeOp::Min,
    FreeOp::Pow,
    FreeOp::Sin,
    FreeOp::Cos,
    FreeOp::Asin,
    FreeOp::Acos,
];

impl FreeOp {
    pub const fn name(self) -> &'static str {
        match self {
            FreeOp::Max => "max",
            FreeOp::Min => "min",
            FreeOp::Pow => "pow",
            FreeOp::Sin => "sin",
            FreeOp::Cos => "cos",
            FreeOp::Asin => "asin",
            FreeOp::Acos => "acos",
        }
    }

    pub const fn arity(self) -> usize {
        match self {
            FreeOp::Max | FreeOp::Min | FreeOp::Pow => 2,
            FreeOp::Sin | FreeOp::Cos | FreeOp::Asin | FreeOp::Acos => 1,
        }
    }

    /// Min/max exist for every family; the math library only for floating point
    pub fn applies_to(self, desc: &TypeDescriptor) -> bool {
        match self {
            FreeOp::Max | FreeOp::Min => true,
            _ => desc.family().is_floating_point(),
        }
    }

    /// Entry point name; comparisons distinguish unsigned lanes (`epuN`)
    pub fn entry(self, desc: &TypeDescriptor) -> String {
        match self {
            FreeOp::Max | FreeOp::Min => format!(
                "{}_{}_{}",
                desc.prefix(),
                self.name(),
                desc.element.ordered_suffix()
            ),
            _ => desc.entry(self.name()),
        }
    }
}

/// Build `op` for `desc` if its entry point is in the catalog
pub fn synthesize_free_function(
    op: FreeOp,
    desc: &TypeDescriptor,
    catalog: &SymbolCatalog,
) -> Option<FreeFunction> {
    let entry = op.entry(desc);
    if !catalog.present(&entry) {
        debug!("{}: omitting {}, no {}", desc.name(), op.name(), entry);
        return None;
    }

    let type_name = desc.name();
    let args = &ARG_NAMES[..op.arity()];
    Some(FreeFunction {
        name: op.name().to_string(),
        ret: type_name.clone(),
        params: args
            .iter()
            .map(|a| Param::new(format!("const {} &", type_name), *a))
            .collect(),
        body: vec![Stmt::Return(Expr::intrinsic(
            entry,
            args.iter().map(|a| Expr::ident(*a)).collect(),
        ))],
    })
}

/// All free functions, descriptor-major in table order
pub fn synthesize_free_functions(
    descriptors: &[TypeDescriptor],
    catalog: &SymbolCatalog,
) -> Vec<FreeFunction> {
    descriptors
        .iter()
        .flat_map(|desc| {
            FREE_OPERATIONS
                .iter()
                .filter(move |op| op.applies_to(desc))
                .filter_map(move |op| synthesize_free_function(*op, desc, catalog))
        })
        .collect()
}

/// Constraint accepting exactly the types generated for `descriptors`
pub fn capability_constraint(descriptors: &[TypeDescriptor]) -> CapabilityConstraint {
    CapabilityConstraint {
        name: CAPABILITY_NAME.to_string(),
        members: descriptors.iter().map(|d| d.name()).collect(),
    }
}

/// `clip(a, b, c) = min(max(a, b), c)`, written once for every accepted type
pub fn clip() -> GenericAlgorithm {
    GenericAlgorithm {
        name: "clip".to_string(),
        constraint: CAPABILITY_NAME.to_string(),
        params: ARG_NAMES
            .iter()
            .map(|a| Param::new("const T &", *a))
            .collect(),
        body: vec![Stmt::Return(Expr::function(
            FreeOp::Min.name(),
            vec![
                Expr::function(FreeOp::Max.name(), vec![Expr::ident("a"), Expr::ident("b")]),
                Expr::ident("c"),
            ],
        ))],
    }
}

/// Generic algorithms, in emission order
pub fn generic_algorithms() -> Vec<GenericAlgorithm> {
    vec![clip()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DEFAULT_DESCRIPTORS;
    use crate::descriptor::ElementType::{F32, F64, I32, U8};
    use crate::descriptor::RegisterWidth::{W128, W256, W512};

    #[test]
    fn test_unsigned_min_max_use_epu_suffix() {
        let d = TypeDescriptor::new(W128, U8);
        assert_eq!(FreeOp::Max.entry(&d), "_mm_max_epu8");
        assert_eq!(FreeOp::Min.entry(&d), "_mm_min_epu8");

        let d = TypeDescriptor::new(W256, I32);
        assert_eq!(FreeOp::Max.entry(&d), "_mm256_max_epi32");

        let d = TypeDescriptor::new(W512, F64);
        assert_eq!(FreeOp::Pow.entry(&d), "_mm512_pow_pd");
    }

    #[test]
    fn test_math_only_for_floating_point() {
        let catalog = SymbolCatalog::from_entry_points(["_mm_sin_epi32", "_mm_max_epi32"]);
        let functions = synthesize_free_functions(&[TypeDescriptor::new(W128, I32)], &catalog);
        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["max"]);
    }

    #[test]
    fn test_free_function_shape() {
        let catalog = SymbolCatalog::from_entry_points(["_mm256_pow_ps", "_mm256_sin_ps"]);
        let functions = synthesize_free_functions(&[TypeDescriptor::new(W256, F32)], &catalog);

        assert_eq!(functions.len(), 2);
        let pow = &functions[0];
        assert_eq!(pow.name, "pow");
        assert_eq!(pow.ret, "FLOATX8");
        assert_eq!(pow.params.len(), 2);
        let sin = &functions[1];
        assert_eq!(sin.params, vec![Param::new("const FLOATX8 &", "a")]);
        assert_eq!(
            sin.body,
            vec![Stmt::Return(Expr::intrinsic("_mm256_sin_ps", vec![Expr::ident("a")]))]
        );
    }

    #[test]
    fn test_constraint_accepts_exactly_generated_names() {
        let tables: [&[TypeDescriptor]; 3] = [
            &DEFAULT_DESCRIPTORS,
            &DEFAULT_DESCRIPTORS[..3],
            &[TypeDescriptor::new(W512, U8)],
        ];
        for table in tables {
            let constraint = capability_constraint(table);
            for d in DEFAULT_DESCRIPTORS {
                assert_eq!(constraint.accepts(&d.name()), table.contains(&d), "{}", d.name());
            }
            assert!(!constraint.accepts("FLOATX3"));
            assert!(!constraint.accepts("std::vector"));
            assert!(!constraint.accepts(""));
        }
    }

    #[test]
    fn test_clip_is_min_of_max() {
        let clip = clip();
        assert_eq!(clip.constraint, CAPABILITY_NAME);
        assert_eq!(clip.params.len(), 3);
        assert_eq!(
            clip.body,
            vec![Stmt::Return(Expr::function(
                "min",
                vec![
                    Expr::function("max", vec![Expr::ident("a"), Expr::ident("b")]),
                    Expr::ident("c"),
                ]
            ))]
        );
    }
}
