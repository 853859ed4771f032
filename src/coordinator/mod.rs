//! # AST Coordinator Stage
//!
//! Sits between the [`analyzer`](crate::analyzer) and the
//! [`renderer`](crate::renderer). It counts the nodes of the parsed tree and
//! runs the optimization passes enabled by the coordinator stage's
//! `OPTIMIZATION_PASSES` section.
//!
//! Passes are registered in a [`PassRegistry`](passes::PassRegistry) and run
//! in registration order. Only constant folding changes the tree today; the
//! other configured passes are registered as identity rewrites so that real
//! implementations can be swapped in through
//! [`PassRegistry::register`](passes::PassRegistry::register).

pub mod passes;

use tracing::{debug, info, warn};

use crate::ast::AstNode;
use crate::config::{ConfigResult, Governance, OptimizationFlags, Stage};
use passes::PassRegistry;

/// Output of the coordinator stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatedAst {
    pub ast: AstNode,
    /// Nodes in the optimized tree.
    pub node_count: usize,
    /// Nodes in the tree as it came out of the parser.
    pub nodes_before: usize,
    pub applied_passes: Vec<&'static str>,
}

#[derive(Debug)]
pub struct AstCoordinator {
    flags: OptimizationFlags,
    registry: PassRegistry,
}

impl AstCoordinator {
    pub fn new(flags: OptimizationFlags) -> Self {
        Self::with_registry(flags, PassRegistry::default())
    }

    pub fn with_registry(flags: OptimizationFlags, registry: PassRegistry) -> Self {
        Self { flags, registry }
    }

    pub fn from_governance<G: Governance + ?Sized>(governance: &G) -> ConfigResult<Self> {
        let config = governance.stage_config(Stage::Coordinator)?;
        let flags = governance.get_optimization_flags(Stage::Coordinator)?;
        info!(
            "Stage {} loaded with SP alignment {} (governance {}, {} sections)",
            config.stage_name,
            config.sp_alignment,
            config.governance_version,
            config.sections.len()
        );

        let coordinator = Self::new(flags);
        for (name, enabled) in coordinator.flags.iter() {
            if !coordinator.registry.contains(name) {
                warn!(
                    "Optimization pass {} (enabled: {}) has no registered implementation",
                    name, enabled
                );
            }
        }
        Ok(coordinator)
    }

    pub fn flags(&self) -> &OptimizationFlags {
        &self.flags
    }

    pub fn registry_mut(&mut self) -> &mut PassRegistry {
        &mut self.registry
    }

    #[tracing::instrument(level = "debug", skip(self, ast))]
    pub fn coordinate(&self, ast: AstNode) -> CoordinatedAst {
        let nodes_before = ast.node_count();
        debug!("AST has {} nodes before optimization", nodes_before);

        let (ast, applied_passes) = self.registry.run(ast, &self.flags);
        let node_count = ast.node_count();
        debug!(
            "AST has {} nodes after passes {:?}",
            node_count, applied_passes
        );

        CoordinatedAst {
            ast,
            node_count,
            nodes_before,
            applied_passes,
        }
    }
}

/// Runs the standard passes enabled in `flags` and returns the optimized
/// tree with its node count.
pub fn coordinate(ast: AstNode, flags: &OptimizationFlags) -> (AstNode, usize) {
    let (ast, _) = PassRegistry::default().run(ast, flags);
    let count = ast.node_count();
    (ast, count)
}
