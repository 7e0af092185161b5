//! Block reachability: can control fall off the end of a block, and can it
//! return from the enclosing function.

use super::Program;
use crate::{BlockId, StatementId, StmtKind};

/// A statement follows one that never continues.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UnreachableStatement(pub StatementId);

impl Program {
    /// Compute `can_continue`/`can_return` for `block` and its nested blocks.
    pub fn compute_reachability(&mut self, block: BlockId) -> Result<(), UnreachableStatement> {
        let mut can_continue = true;
        let mut can_return = false;
        let statements = self.block(block).statements.clone();
        for statement in statements {
            if !can_continue {
                return Err(UnreachableStatement(statement));
            }
            let kind = self.statement(statement).kind;
            if matches!(kind, StmtKind::Switch | StmtKind::Typeswitch) {
                self.switch_reachability(statement, &mut can_continue, &mut can_return)?;
            } else {
                self.statement_reachability(statement, &mut can_continue, &mut can_return)?;
            }
        }
        let record = self.block_mut(block);
        record.can_continue = can_continue;
        record.can_return = can_return;
        Ok(())
    }

    fn switch_reachability(
        &mut self,
        statement: StatementId,
        can_continue: &mut bool,
        can_return: &mut bool,
    ) -> Result<(), UnreachableStatement> {
        let Some(sub_block) = self.statement(statement).sub_block else {
            return Ok(());
        };
        let mut any_continue = false;
        let mut has_default = false;
        for case in self.block(sub_block).statements.clone() {
            if let Some(case_block) = self.statement(case).sub_block {
                self.compute_reachability(case_block)?;
                *can_return |= self.block(case_block).can_return;
                any_continue |= self.block(case_block).can_continue;
            }
            has_default |= self.statement(case).kind == StmtKind::Default;
        }
        *can_continue &= any_continue || !has_default;
        Ok(())
    }

    fn statement_reachability(
        &mut self,
        statement: StatementId,
        can_continue: &mut bool,
        can_return: &mut bool,
    ) -> Result<(), UnreachableStatement> {
        let mut sub_continues = true;
        if let Some(sub_block) = self.statement(statement).sub_block {
            self.compute_reachability(sub_block)?;
            *can_return |= self.block(sub_block).can_return;
            sub_continues = self.block(sub_block).can_continue;
        }
        match self.statement(statement).kind {
            StmtKind::Else => {
                if self.all_if_clauses_return(statement) {
                    *can_continue = false;
                }
            }
            StmtKind::Do => *can_continue &= sub_continues,
            StmtKind::Throw => *can_continue = false,
            StmtKind::Return => {
                *can_continue = false;
                *can_return = true;
            }
            StmtKind::Yield => *can_return = true,
            _ => {}
        }
        Ok(())
    }

    /// An if/elseif/else chain ending at `else_statement` where no clause
    /// falls through.
    fn all_if_clauses_return(&self, else_statement: StatementId) -> bool {
        let block = self.statement(else_statement).block;
        let statements = &self.block(block).statements;
        let Some(end) = statements.iter().position(|&s| s == else_statement) else {
            return false;
        };
        for &statement in statements[..=end].iter().rev() {
            let record = self.statement(statement);
            if !matches!(record.kind, StmtKind::If | StmtKind::ElseIf | StmtKind::Else) {
                return true;
            }
            if let Some(sub_block) = record.sub_block {
                if self.block(sub_block).can_continue {
                    return false;
                }
            }
            if record.kind == StmtKind::If {
                return true;
            }
        }
        true
    }
}
