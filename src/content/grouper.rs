//! Grouping of tokens into instructions.
//!
//! The tokenizer drives a [`ParserCallbacks`] implementation; the
//! [`OperandGrouper`] is the one used by the parse entry points. It buffers
//! operands until an operator arrives and then emits the group as an
//! instruction, subject to the operator whitelist.

use crate::content::operators::{Instruction, Operand, Operator, OperatorWhitelist};
use crate::content::tokenizer::{ContentToken, LocatedToken};
use std::ops::ControlFlow;

/// Receiver of content stream tokens.
pub trait ParserCallbacks {
    /// Handle one token. Returning `Break` stops tokenizing; `handle_eof` is
    /// not called in that case.
    fn handle_token(&mut self, token: LocatedToken) -> ControlFlow<()>;

    /// Called once after the last token.
    fn handle_eof(&mut self);
}

/// Collects tokens into instructions.
#[derive(Debug, Clone, Default)]
pub struct OperandGrouper {
    whitelist: OperatorWhitelist,
    operands: Vec<Operand>,
    instructions: Vec<Instruction>,
    warning: Option<String>,
}

impl OperandGrouper {
    /// Create a grouper keeping only instructions allowed by `whitelist`.
    pub fn new(whitelist: OperatorWhitelist) -> Self {
        Self {
            whitelist,
            ..Self::default()
        }
    }

    /// Instructions emitted so far.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Take the emitted instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Warning about discarded trailing operands, if the stream had any.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    fn emit(&mut self, operands: Vec<Operand>, operator: Operator) {
        if self.whitelist.allows(&operator) {
            self.instructions.push(Instruction { operands, operator });
        }
    }
}

impl ParserCallbacks for OperandGrouper {
    fn handle_token(&mut self, token: LocatedToken) -> ControlFlow<()> {
        match token.token {
            ContentToken::Operand(obj) => self.operands.push(Operand::Object(obj)),
            ContentToken::Operator(operator) => {
                let operands = std::mem::take(&mut self.operands);
                self.emit(operands, operator);
            },
            ContentToken::InlineImage(image) => {
                if !self.operands.is_empty() {
                    log::warn!(
                        "Discarding {} operands before inline image at line {}",
                        self.operands.len(),
                        token.line
                    );
                    self.operands.clear();
                }
                self.emit(vec![Operand::InlineImage(image)], Operator::inline_image());
            },
        }
        ControlFlow::Continue(())
    }

    fn handle_eof(&mut self) {
        if self.operands.is_empty() {
            return;
        }
        let message = format!(
            "unexpected end of stream: {} operands discarded",
            self.operands.len()
        );
        log::warn!("{}", message);
        self.warning = Some(message);
        self.operands.clear();
    }
}
