use otter_inc::engine::BooleanEngine;
use otter_inc::structures::model::Value;
use otter_inc::{config::Config, context::Context, reports::Report};

mod checks {

    use super::*;

    #[test]
    fn model_satisfies_assertions() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let x = terms.mk_bv_const("x", 4).unwrap();
        let y = terms.mk_bv_const("y", 4).unwrap();
        let one = terms.mk_numeral(1, 4).unwrap();
        let x_plus_one = terms.mk_bvadd(x, one).unwrap();
        let y_is_x_plus_one = terms.mk_eq(y, x_plus_one).unwrap();
        let x_lt_y = terms.mk_bvult(x, y).unwrap();
        let p_or_q = terms.mk_or(vec![p, q]);
        let not_p = terms.mk_not(p);
        let q_implies_x_lt_y = terms.mk_implies(q, x_lt_y);
        let at_most_one = terms.mk_at_most(1, vec![p, q]).unwrap();

        for formula in [y_is_x_plus_one, p_or_q, q_implies_x_lt_y, at_most_one] {
            ctx.assert_formula(formula);
        }

        assert_eq!(ctx.check(&[not_p]), Ok(Report::Satisfiable));
        let model = ctx.model().cloned().unwrap();

        for formula in ctx.assertions() {
            assert_eq!(
                model.eval(ctx.terms(), *formula, true),
                Some(Value::Bool(true))
            );
        }
        assert_eq!(model.value_of(q), Some(Value::Bool(true)));
    }

    #[test]
    fn core_is_unsatisfiable() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let r = terms.mk_bool_const("r");
        let s = terms.mk_bool_const("s");
        let p_implies_q = terms.mk_implies(p, q);
        let q_implies_r = terms.mk_implies(q, r);
        let not_r = terms.mk_not(r);

        ctx.assert_formula(p_implies_q);
        ctx.assert_formula(q_implies_r);

        let assumptions = [s, p, not_r];
        assert_eq!(ctx.check(&assumptions), Ok(Report::Unsatisfiable));

        let core = ctx.unsat_core().to_vec();
        assert!(!core.is_empty());
        assert!(core.iter().all(|term| assumptions.contains(term)));
        assert!(!core.contains(&s));

        assert_eq!(ctx.check(&core), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn compound_assumptions() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let not_q = terms.mk_not(q);
        let p_and_q = terms.mk_and(vec![p, q]);
        let top = terms.mk_true();

        ctx.assert_formula(not_q);
        assert_eq!(ctx.check(&[top, p_and_q]), Ok(Report::Unsatisfiable));
        assert_eq!(ctx.unsat_core(), &[p_and_q]);

        assert_eq!(ctx.check(&[top, p]), Ok(Report::Satisfiable));
        assert_eq!(ctx.assumption_literals().len(), 1);
    }

    #[test]
    fn unsatisfiable_without_assumptions() {
        let mut ctx = Context::from_config(Config::default());
        let p = ctx.terms_mut().mk_bool_const("p");
        let not_p = ctx.terms_mut().mk_not(p);

        ctx.assert_formula(p);
        ctx.assert_formula(not_p);
        assert_eq!(ctx.check(&[]), Ok(Report::Unsatisfiable));
        assert!(ctx.unsat_core().is_empty());
        assert!(ctx.model().is_none());
    }

    #[test]
    fn internalize_twice() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let p_xor_q = terms.mk_xor(p, q);

        ctx.assert_formula(p_xor_q);
        assert_eq!(ctx.internalize_formulas(), Report::Satisfiable);

        let atoms = ctx.engine.atom_count();
        let prefix = ctx.formula_log().lowered_prefix();
        let lowered = ctx.counters.lowered_formulas;
        assert_eq!(prefix, 1);

        assert_eq!(ctx.internalize_formulas(), Report::Satisfiable);
        assert_eq!(ctx.engine.atom_count(), atoms);
        assert_eq!(ctx.formula_log().lowered_prefix(), prefix);
        assert_eq!(ctx.counters.lowered_formulas, lowered);
    }

    #[test]
    fn weighted_max_weight() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let not_p = terms.mk_not(p);
        let not_q = terms.mk_not(q);
        let p_or_q = terms.mk_or(vec![p, q]);

        ctx.assert_formula(p_or_q);

        assert_eq!(
            ctx.check_weighted(&[not_p, not_q], &[3.0, 1.0], 1.0),
            Ok(Report::Satisfiable)
        );
        let model = ctx.model().cloned().unwrap();
        assert_eq!(model.value_of(p), Some(Value::Bool(false)));
        assert_eq!(model.value_of(q), Some(Value::Bool(true)));

        assert_eq!(
            ctx.check_weighted(&[not_p, not_q], &[3.0, 1.0], 0.5),
            Ok(Report::Unsatisfiable)
        );
        assert!(!ctx.unsat_core().is_empty());
        assert!(ctx.unsat_core().iter().all(|term| [not_p, not_q].contains(term)));
    }

    #[test]
    fn cancel() {
        let mut ctx = Context::from_config(Config::default());
        let p = ctx.terms_mut().mk_bool_const("p");
        let q = ctx.terms_mut().mk_bool_const("q");
        let p_or_q = ctx.terms_mut().mk_or(vec![p, q]);

        ctx.assert_formula(p_or_q);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));

        ctx.terms().limit().cancel();
        assert_eq!(ctx.check(&[]), Ok(Report::Unknown));
        assert_eq!(ctx.reason_unknown(), "canceled");
        assert_eq!(ctx.report(), Report::Unknown);
        assert!(ctx.model().is_none());

        ctx.terms().limit().reset();
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));
        assert_eq!(ctx.counters.unknowns, 1);
    }

    #[test]
    fn statistics() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut ctx = Context::from_config(Config::default());
        let p = ctx.terms_mut().mk_bool_const("p");

        ctx.assert_formula(p);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));

        let statistics = ctx.collect_statistics();
        assert_eq!(statistics.get("context.checks"), Some(2));
        assert_eq!(statistics.get("context.lowered_formulas"), Some(1));
        assert_eq!(statistics.get("engine.checks"), Some(2));
    }

    #[test]
    fn reason_unknown_default() {
        let mut ctx = Context::from_config(Config::default());
        assert_eq!(ctx.reason_unknown(), "no reason given");
        ctx.set_reason_unknown("interrupted");
        assert_eq!(ctx.reason_unknown(), "interrupted");
    }
}
