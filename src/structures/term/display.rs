use super::{Term, TermKind, TermManager};

/// A term paired with its manager, for display.
///
/// Terms are written in the style of SMT-LIB.
pub struct TermDisplay<'m> {
    terms: &'m TermManager,
    term: Term,
}

impl TermManager {
    /// A displayable form of the term.
    pub fn display(&self, term: Term) -> TermDisplay<'_> {
        TermDisplay { terms: self, term }
    }

    /// The display of each term, separated by a space and enclosed in brackets.
    pub fn display_all(&self, terms: &[Term]) -> String {
        let displayed = terms
            .iter()
            .map(|term| self.display(*term).to_string())
            .collect::<Vec<_>>();
        format!("[{}]", displayed.join(" "))
    }
}

impl TermDisplay<'_> {
    fn nested(&self, term: Term) -> TermDisplay<'_> {
        TermDisplay {
            terms: self.terms,
            term,
        }
    }

    fn application(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        operator: &str,
        args: &[Term],
    ) -> std::fmt::Result {
        write!(f, "({operator}")?;
        for arg in args {
            write!(f, " {}", self.nested(*arg))?;
        }
        write!(f, ")")
    }
}

impl std::fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TermKind::*;
        let node = self.terms.node(self.term);
        match &node.kind {
            True => write!(f, "true"),
            False => write!(f, "false"),
            Const(name) => write!(f, "{name}"),
            Numeral(value) => {
                let width = self.terms.bv_width(self.term).unwrap_or_default();
                write!(f, "(_ bv{value} {width})")
            }

            App(name, args) => self.application(f, name, args),

            Not(a) => self.application(f, "not", &[*a]),
            And(args) => self.application(f, "and", args),
            Or(args) => self.application(f, "or", args),
            Implies(a, b) => self.application(f, "=>", &[*a, *b]),
            Xor(a, b) => self.application(f, "xor", &[*a, *b]),
            Eq(a, b) => self.application(f, "=", &[*a, *b]),
            Ite(c, a, b) => self.application(f, "ite", &[*c, *a, *b]),
            Distinct(args) => self.application(f, "distinct", args),

            BvNot(a) => self.application(f, "bvnot", &[*a]),
            BvAnd(a, b) => self.application(f, "bvand", &[*a, *b]),
            BvOr(a, b) => self.application(f, "bvor", &[*a, *b]),
            BvXor(a, b) => self.application(f, "bvxor", &[*a, *b]),
            BvAdd(a, b) => self.application(f, "bvadd", &[*a, *b]),
            BvUlt(a, b) => self.application(f, "bvult", &[*a, *b]),
            BvUle(a, b) => self.application(f, "bvule", &[*a, *b]),

            AtMost(k, args) => self.application(f, &format!("(_ at-most {k})"), args),
            AtLeast(k, args) => self.application(f, &format!("(_ at-least {k})"), args),
        }
    }
}
