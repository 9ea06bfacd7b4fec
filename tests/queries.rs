use otter_inc::structures::literal::Literal;
use otter_inc::structures::term::TermManager;
use otter_inc::types::err::ErrorKind;
use otter_inc::{config::Config, context::Context, reports::Report};

mod consequences {

    use super::*;

    #[test]
    fn bit_vector_consequence() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let a = terms.mk_bool_const("a");
        let x = terms.mk_bv_const("x", 4).unwrap();
        let one = terms.mk_numeral(1, 4).unwrap();
        let x_is_one = terms.mk_eq(x, one).unwrap();
        let a_implies_x_is_one = terms.mk_implies(a, x_is_one);

        ctx.assert_formula(a_implies_x_is_one);

        let (report, consequences) = ctx.consequences(&[a], &[x]).unwrap();
        assert_eq!(report, Report::Satisfiable);
        assert_eq!(consequences, vec![a_implies_x_is_one]);
    }

    #[test]
    fn unfixed_and_unknown_variables_are_skipped() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let a = terms.mk_bool_const("a");
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let unused = terms.mk_bool_const("unused");
        let not_q = terms.mk_not(q);
        let a_implies_not_q = terms.mk_implies(a, not_q);
        let p_or_q = terms.mk_or(vec![p, q]);

        ctx.assert_formula(a_implies_not_q);
        ctx.assert_formula(p_or_q);

        let (report, consequences) = ctx.consequences(&[a], &[q, unused, p]).unwrap();
        assert_eq!(report, Report::Satisfiable);

        let a_implies_p = ctx.terms_mut().mk_implies(a, p);
        assert_eq!(consequences, vec![a_implies_not_q, a_implies_p]);
    }

    #[test]
    fn without_premises() {
        let mut ctx = Context::from_config(Config::default());
        let p = ctx.terms_mut().mk_bool_const("p");

        ctx.assert_formula(p);
        let (report, consequences) = ctx.consequences(&[], &[p]).unwrap();
        assert_eq!(report, Report::Satisfiable);

        let top = ctx.terms_mut().mk_true();
        let top_implies_p = ctx.terms_mut().mk_implies(top, p);
        assert_eq!(consequences, vec![top_implies_p]);
    }

    #[test]
    fn unsatisfiable_assumptions() {
        let mut ctx = Context::from_config(Config::default());
        let p = ctx.terms_mut().mk_bool_const("p");
        let not_p = ctx.terms_mut().mk_not(p);

        ctx.assert_formula(p);
        let (report, consequences) = ctx.consequences(&[not_p], &[p]).unwrap();
        assert_eq!(report, Report::Unsatisfiable);
        assert!(consequences.is_empty());
        assert_eq!(ctx.unsat_core(), &[not_p]);
    }
}

mod mutexes {

    use super::*;

    #[test]
    fn at_most_one() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let r = terms.mk_bool_const("r");
        let at_most_one = terms.mk_at_most(1, vec![p, q, r]).unwrap();

        ctx.assert_formula(at_most_one);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));

        let (report, mutexes) = ctx.find_mutexes(&[p, q, r]);
        assert_eq!(report, Report::Satisfiable);
        assert_eq!(mutexes, vec![vec![p, q, r]]);
    }

    #[test]
    fn negations_and_unknown_atoms() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let unknown = terms.mk_bool_const("unknown");
        let not_p = terms.mk_not(p);
        let p_or_q = terms.mk_or(vec![p, q]);

        ctx.assert_formula(p_or_q);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));

        let (report, mutexes) = ctx.find_mutexes(&[not_p, unknown, q]);
        assert_eq!(report, Report::Satisfiable);
        assert!(mutexes.is_empty());

        let not_q = ctx.terms_mut().mk_not(q);
        let (_, mutexes) = ctx.find_mutexes(&[not_p, not_q]);
        assert_eq!(mutexes, vec![vec![not_p, not_q]]);
    }
}

mod translate {

    use super::*;

    #[test]
    fn logs_are_reproduced() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let guard = terms.mk_bool_const("guard");
        let x = terms.mk_bv_const("x", 4).unwrap();
        let two = terms.mk_numeral(2, 4).unwrap();
        let x_is_two = terms.mk_eq(x, two).unwrap();
        let p_or_q = terms.mk_or(vec![p, q]);

        ctx.assert_formula(p_or_q);
        ctx.assert_conditional(x_is_two, guard);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));

        let mut translated = ctx.translate(TermManager::default()).unwrap();
        assert_eq!(translated.assertion_count(), ctx.assertion_count());
        assert_eq!(translated.assumption_count(), ctx.assumption_count());
        assert_eq!(translated.formula_log().lowered_prefix(), 0);

        for (original, copy) in ctx.assertions().iter().zip(translated.assertions()) {
            assert_eq!(
                ctx.terms().display(*original).to_string(),
                translated.terms().display(*copy).to_string()
            );
        }

        assert_eq!(translated.check(&[]), Ok(Report::Satisfiable));
        let copy_of_guard = translated.assumptions()[0];
        assert_eq!(translated.terms().display(copy_of_guard).to_string(), "guard");
    }

    #[test]
    fn open_scope_is_invalid() {
        let mut ctx = Context::from_config(Config::default());
        let p = ctx.terms_mut().mk_bool_const("p");
        ctx.assert_formula(p);

        ctx.push();
        assert_eq!(
            ctx.translate(TermManager::default()).err(),
            Some(ErrorKind::InvalidState)
        );

        ctx.pop(1);
        assert!(ctx.translate(TermManager::default()).is_ok());
    }
}

mod display {

    use super::*;

    #[test]
    fn wcnf_indicators() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let not_p = terms.mk_not(p);
        let not_q = terms.mk_not(q);
        let p_or_q = terms.mk_or(vec![p, q]);

        ctx.assert_formula(p_or_q);

        let mut out = Vec::default();
        assert!(ctx.display_weighted(&mut out, &[not_p, not_q], &[2, 3]).is_ok());
        let wcnf = String::from_utf8(out).unwrap();

        let comments = wcnf.lines().filter(|line| line.starts_with("c ")).collect::<Vec<_>>();
        assert_eq!(comments.len(), 2);
        assert!(comments[0].ends_with("(not p)"));
        assert!(comments[1].ends_with("(not q)"));

        let header = wcnf.lines().find(|line| line.starts_with("p wcnf")).unwrap();
        assert!(header.ends_with(" 6"));

        let soft = wcnf
            .lines()
            .filter(|line| line.starts_with("2 ") || line.starts_with("3 "))
            .count();
        assert_eq!(soft, 2);

        assert_eq!(ctx.assertion_count(), 3);
    }

    #[test]
    fn guards_are_hard() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let guard = terms.mk_bool_const("guard");
        let not_p = terms.mk_not(p);

        ctx.assert_conditional(not_p, guard);

        let mut out = Vec::default();
        assert!(ctx.display_weighted(&mut out, &[p], &[1]).is_ok());
        let wcnf = String::from_utf8(out).unwrap();

        assert_eq!(ctx.assumption_literals().len(), 1);
        let guard_unit = format!("2 {} 0", ctx.assumption_literals()[0].as_int());
        assert!(wcnf.lines().any(|line| line == guard_unit));

        let header = wcnf.lines().find(|line| line.starts_with("p wcnf")).unwrap();
        assert!(header.ends_with(" 2"));
        assert_eq!(wcnf.lines().filter(|line| line.starts_with("1 ")).count(), 1);
    }

    #[test]
    fn lowering_failure_is_an_error() {
        let mut config = Config::default();
        assert!(config.pipeline.max_bits.set(4).is_ok());
        let mut ctx = Context::from_config(config);

        let terms = ctx.terms_mut();
        let x = terms.mk_bv_const("x", 8).unwrap();
        let zero = terms.mk_numeral(0, 8).unwrap();
        let x_is_zero = terms.mk_eq(x, zero).unwrap();

        let mut out = Vec::default();
        assert!(matches!(
            ctx.display_weighted(&mut out, &[x_is_zero], &[1]),
            Err(ErrorKind::Lowering(_))
        ));
    }
}
