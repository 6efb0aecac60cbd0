use std::collections::HashMap;

use crate::error::{CompileError, Result};
use crate::pattern::{Grammar, Pattern};
use crate::program::{Inst, InstPtr, Program};

#[derive(Debug)]
enum MaybeInst {
    Compiled(Inst),
    /// A split or jump whose offsets are patched once its body is laid out.
    Hole,
    /// A rule call waiting for the rule table.
    OpenCall(String),
}

pub(crate) struct Compiler {
    insts: Vec<MaybeInst>,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler { insts: vec![] }
    }

    pub fn compile(mut self, pattern: &Pattern) -> Result<Program> {
        self.c(pattern);
        self.finish(&HashMap::new())
    }

    pub fn compile_grammar(mut self, grammar: &Grammar) -> Result<Program> {
        self.insts.push(MaybeInst::OpenCall(grammar.root().to_string()));
        self.push_compiled(Inst::End);

        let mut table = HashMap::new();
        for (name, body) in grammar.rules() {
            if table.insert(name.clone(), self.insts.len()).is_some() {
                return Err(CompileError::DuplicateRule(name.clone()).into());
            }
            self.c(body);
            self.push_compiled(Inst::Return);
        }
        self.finish(&table)
    }

    fn finish(self, table: &HashMap<String, InstPtr>) -> Result<Program> {
        let insts = self
            .insts
            .into_iter()
            .map(|i| match i {
                MaybeInst::Compiled(inst) => Ok(inst),
                MaybeInst::OpenCall(name) => table
                    .get(&name)
                    .map(|&addr| Inst::Call(addr))
                    .ok_or(CompileError::UnknownRule(name)),
                MaybeInst::Hole => unreachable!("every hole is filled by the node that made it"),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        tracing::trace!(target: "keygrammar::compile", len = insts.len(), "compiled program");
        Ok(Program::new(insts))
    }

    fn pc(&self) -> InstPtr {
        self.insts.len()
    }

    fn push_compiled(&mut self, inst: Inst) {
        self.insts.push(MaybeInst::Compiled(inst));
    }

    fn push_hole(&mut self) -> InstPtr {
        let hole = self.pc();
        self.insts.push(MaybeInst::Hole);
        hole
    }

    fn fill(&mut self, hole: InstPtr, inst: Inst) {
        debug_assert!(matches!(self.insts[hole], MaybeInst::Hole));
        self.insts[hole] = MaybeInst::Compiled(inst);
    }

    fn c(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Literal(ev) => self.push_compiled(Inst::Consume(ev.clone())),
            Pattern::Sequence(a, b) => {
                self.c(a);
                self.c(b);
            }
            Pattern::Alternation(a, b) => self.c_alternation(a, b),
            Pattern::Star(p) => self.c_zero_or_more(p),
            Pattern::Plus(p) => self.c_one_or_more(p),
            Pattern::Optional(p) => self.c_zero_or_one(p),
            Pattern::Capture(p, template) => {
                self.push_compiled(Inst::CapStart);
                self.c(p);
                self.push_compiled(Inst::CapEnd(template.clone()));
            }
            Pattern::EndOfInput => self.push_compiled(Inst::End),
            Pattern::NonTerminal(name) => self.insts.push(MaybeInst::OpenCall(name.clone())),
        }
    }

    // split 1, L1; <a>; L1-1: jump L2; <b>; L2:
    fn c_alternation(&mut self, a: &Pattern, b: &Pattern) {
        let split = self.push_hole();
        self.c(a);
        let jump = self.push_hole();
        self.c(b);
        let end = self.pc();
        self.fill(split, Inst::Split(1, offset(split, jump + 1)));
        self.fill(jump, Inst::Jump(offset(jump, end)));
    }

    // L0: split 1, L1; <p>; jump L0; L1:
    fn c_zero_or_more(&mut self, p: &Pattern) {
        let split = self.push_hole();
        self.c(p);
        let jump = self.pc();
        self.push_compiled(Inst::Jump(offset(jump, split)));
        self.fill(split, Inst::Split(1, offset(split, jump + 1)));
    }

    // L0: <p>; split L0, 1
    fn c_one_or_more(&mut self, p: &Pattern) {
        let entry = self.pc();
        self.c(p);
        let split = self.pc();
        self.push_compiled(Inst::Split(offset(split, entry), 1));
    }

    // split 1, L1; <p>; L1:
    fn c_zero_or_one(&mut self, p: &Pattern) {
        let split = self.push_hole();
        self.c(p);
        let end = self.pc();
        self.fill(split, Inst::Split(1, offset(split, end)));
    }
}

fn offset(from: InstPtr, to: InstPtr) -> isize {
    to as isize - from as isize
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::event::Event;
    use crate::key::KeyEvent;
    use pretty_assertions::assert_eq;

    fn lit(c: char) -> Pattern {
        Pattern::lit(Event::key(KeyEvent::char(c)))
    }

    fn consume(c: char) -> Inst {
        Inst::Consume(Event::key(KeyEvent::char(c)))
    }

    fn c(p: &Pattern) -> Vec<Inst> {
        p.compile().expect("should compile").insts().to_vec()
    }

    #[test]
    fn concat() {
        assert_eq!(
            c(&Pattern::seq([lit('a'), lit('b')])),
            vec![consume('a'), consume('b')]
        );
    }

    #[test]
    fn alternate() {
        assert_eq!(
            c(&lit('a').or(lit('b'))),
            vec![Inst::Split(1, 3), consume('a'), Inst::Jump(2), consume('b')]
        );
        assert_eq!(
            c(&Pattern::alt([lit('a'), lit('b'), lit('c')])),
            vec![
                Inst::Split(1, 3),
                consume('a'),
                Inst::Jump(5),
                Inst::Split(1, 3),
                consume('b'),
                Inst::Jump(2),
                consume('c'),
            ]
        );
    }

    #[test]
    fn repeat_zero_or_many() {
        assert_eq!(
            c(&lit('a').star()),
            vec![Inst::Split(1, 3), consume('a'), Inst::Jump(-2)]
        );
        assert_eq!(
            c(&lit('a').then(lit('b').then(lit('c')).star())),
            vec![
                consume('a'),
                Inst::Split(1, 4),
                consume('b'),
                consume('c'),
                Inst::Jump(-3),
            ]
        );
    }

    #[test]
    fn repeat_zero_or_one() {
        assert_eq!(c(&lit('a').opt()), vec![Inst::Split(1, 2), consume('a')]);
    }

    #[test]
    fn repeat_one_or_many() {
        assert_eq!(c(&lit('a').plus()), vec![consume('a'), Inst::Split(-1, 1)]);
        assert_eq!(
            c(&lit('a').then(lit('b')).plus()),
            vec![consume('a'), consume('b'), Inst::Split(-2, 1)]
        );
    }

    #[test]
    fn capture_and_end() {
        assert_eq!(
            c(&lit('d').cap("delete").then(Pattern::end())),
            vec![
                Inst::CapStart,
                consume('d'),
                Inst::CapEnd("delete".to_string()),
                Inst::End,
            ]
        );
    }

    #[test]
    fn bare_non_terminal_is_unknown() {
        assert_eq!(
            Pattern::non_terminal("motion").compile(),
            Err(Error::Compile(CompileError::UnknownRule("motion".to_string())))
        );
    }

    #[test]
    fn grammar_lays_out_rules_after_entry() {
        let g = Grammar::new("cmd")
            .rule("cmd", lit('d').then(Pattern::non_terminal("motion")))
            .rule("motion", lit('w'));
        assert_eq!(
            g.compile().expect("should compile").insts(),
            &[
                Inst::Call(2),
                Inst::End,
                consume('d'),
                Inst::Call(5),
                Inst::Return,
                consume('w'),
                Inst::Return,
            ]
        );
    }

    #[test]
    fn grammar_rejects_unknown_and_duplicate_rules() {
        let unknown_root = Grammar::new("main").rule("cmd", lit('x'));
        assert_eq!(
            unknown_root.compile(),
            Err(Error::Compile(CompileError::UnknownRule("main".to_string())))
        );
        let dup = Grammar::new("a").rule("a", lit('x')).rule("a", lit('y'));
        assert_eq!(
            dup.compile(),
            Err(Error::Compile(CompileError::DuplicateRule("a".to_string())))
        );
    }
}
