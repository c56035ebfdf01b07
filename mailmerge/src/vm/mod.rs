use crate::compiler::ast::{self, Block};
use crate::error::{Error, ErrorKind};
use crate::value::Value;
use crate::vm::context::Context;

mod context;

/// The function used to turn markdown into HTML.
pub type MarkdownRenderer = dyn Fn(&str) -> String + Send + Sync;

/// Helps to evaluate something.
///
/// The vm walks the tree of blocks and writes into a single output
/// buffer.  It holds no per-render state so one instance can be shared.
pub struct Vm<'env> {
    markdown: &'env MarkdownRenderer,
}

impl<'env> Vm<'env> {
    /// Creates a new VM.
    pub fn new(markdown: &'env MarkdownRenderer) -> Vm<'env> {
        Vm { markdown }
    }

    /// Renders a template against a context value.
    ///
    /// Errors abort the rendering.  They are tagged with `name` and the
    /// line of the block that failed.
    pub fn eval(&self, ast: &ast::Ast<'_>, root: &Value, name: &str) -> Result<String, Error> {
        let mut out = String::new();
        let mut ctx = Context::new(root);
        ok!(self.eval_blocks(&ast.blocks, &mut ctx, &mut out, name));
        Ok(out)
    }

    fn eval_blocks<'ctx>(
        &self,
        blocks: &[Block<'_>],
        ctx: &mut Context<'ctx>,
        out: &mut String,
        name: &str,
    ) -> Result<(), Error> {
        for block in blocks {
            if let Err(mut err) = self.eval_block(block, ctx, out, name) {
                if err.line().is_none() {
                    err.set_location(name, block.span().start_line as usize);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn eval_block<'ctx>(
        &self,
        block: &Block<'_>,
        ctx: &mut Context<'ctx>,
        out: &mut String,
        name: &str,
    ) -> Result<(), Error> {
        match block {
            Block::Text(text) => out.push_str(text.content),
            Block::Replace(replace) => match ok!(ctx.resolve(replace.path)) {
                Value::String(s) => out.push_str(s),
                value => out.push_str(&value.to_string()),
            },
            Block::MdReplace(replace) => {
                let value = ok!(ctx.resolve(replace.path));
                match value.as_str() {
                    Some(text) => out.push_str(&(self.markdown)(text)),
                    None => {
                        return Err(Error::new(
                            ErrorKind::MissingParameter,
                            format!(
                                "parameter `{}` is a {}, markdown needs a string",
                                replace.path,
                                value.kind()
                            ),
                        ))
                    }
                }
            }
            Block::If(cond) => {
                let value = ok!(ctx.resolve(cond.condition));
                let branch = match value.truthiness() {
                    Some(true) => &cond.consequence,
                    Some(false) => &cond.alternative,
                    None => {
                        return Err(Error::new(
                            ErrorKind::ConditionType,
                            format!(
                                "condition `{}` is a {} which has no truth value",
                                cond.condition,
                                value.kind()
                            ),
                        ))
                    }
                };
                ok!(self.eval_blocks(branch, ctx, out, name));
            }
            Block::Loop(each) => {
                let value = ok!(ctx.resolve(each.source));
                let items = match value.as_slice() {
                    Some(items) => items,
                    None => {
                        return Err(Error::new(
                            ErrorKind::MissingParameter,
                            format!(
                                "parameter `{}` is a {}, expected a sequence",
                                each.source,
                                value.kind()
                            ),
                        ))
                    }
                };
                for item in items {
                    ctx.push_item(item);
                    let rv = self.eval_blocks(&each.body, ctx, out, name);
                    ctx.pop_item();
                    ok!(rv);
                }
            }
        }
        Ok(())
    }
}
