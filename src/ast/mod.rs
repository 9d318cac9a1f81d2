/// AST (Abstract Syntax Tree) module
/// Contains the tree produced by the parser
///
/// Submodules:
/// - ast: Node definitions, structural equality and normalization
/// - display: Rendering back to text and to S-expressions
pub mod ast;
pub mod display;
