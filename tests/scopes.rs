use otter_inc::engine::BooleanEngine;
use otter_inc::structures::model::Value;
use otter_inc::{config::Config, context::Context, reports::Report};

mod scopes {

    use super::*;

    #[test]
    fn pop_restores_logs() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let r = terms.mk_bool_const("r");
        let s = terms.mk_bool_const("s");
        let p_or_q = terms.mk_or(vec![p, q]);
        let r_xor_s = terms.mk_xor(r, s);
        let not_q = terms.mk_not(q);

        ctx.assert_formula(p_or_q);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));

        let assertions = ctx.assertions().to_vec();
        let atom_count = ctx.atom_map().len();
        let prefix = ctx.formula_log().lowered_prefix();

        ctx.push();
        ctx.assert_formula(r_xor_s);
        ctx.assert_conditional(not_q, s);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));
        assert!(ctx.atom_map().len() > atom_count);
        assert_eq!(ctx.assumption_count(), 1);

        ctx.pop(1);
        assert_eq!(ctx.assertions(), assertions.as_slice());
        assert_eq!(ctx.atom_map().len(), atom_count);
        assert_eq!(ctx.formula_log().lowered_prefix(), prefix);
        assert_eq!(ctx.assumption_count(), 0);
        assert_eq!(ctx.scope_level(), 0);
        assert_eq!(ctx.engine.scope_level(), 0);
    }

    #[test]
    fn formulas_lowered_in_scope_are_lowered_again() {
        let mut ctx = Context::from_config(Config::default());
        let p = ctx.terms_mut().mk_bool_const("p");
        let not_p = ctx.terms_mut().mk_not(p);

        ctx.assert_formula(p);
        ctx.push();
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));
        assert_eq!(ctx.formula_log().pending().len(), 0);

        ctx.pop(1);
        assert_eq!(ctx.formula_log().pending(), &[p]);
        assert_eq!(ctx.check(&[not_p]), Ok(Report::Unsatisfiable));
        assert_eq!(ctx.unsat_core(), &[not_p]);
    }

    #[test]
    fn over_pop_is_clamped() {
        let mut ctx = Context::from_config(Config::default());
        let p = ctx.terms_mut().mk_bool_const("p");
        let not_p = ctx.terms_mut().mk_not(p);

        ctx.assert_formula(p);
        ctx.push();
        ctx.push();
        ctx.assert_formula(not_p);
        assert_eq!(ctx.check(&[]), Ok(Report::Unsatisfiable));

        ctx.pop(5);
        assert_eq!(ctx.scope_level(), 0);
        assert_eq!(ctx.engine.scope_level(), 0);
        assert_eq!(ctx.assertions(), &[p]);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));

        ctx.pop(1);
        assert_eq!(ctx.assertions(), &[p]);
    }

    #[test]
    fn guards_are_retracted_with_their_scope() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let p = terms.mk_bool_const("p");
        let guard = terms.mk_bool_const("guard");
        let not_p = terms.mk_not(p);

        ctx.push();
        ctx.assert_conditional(not_p, guard);
        assert_eq!(ctx.assumptions(), &[guard]);
        assert_eq!(ctx.check(&[p]), Ok(Report::Unsatisfiable));

        let mut core = ctx.unsat_core().to_vec();
        core.sort();
        let mut expected = vec![p, guard];
        expected.sort();
        assert_eq!(core, expected);

        ctx.pop(1);
        assert!(ctx.assumptions().is_empty());
        assert_eq!(ctx.check(&[p]), Ok(Report::Satisfiable));
    }

    #[test]
    fn blasted_constants_are_scoped() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let x = terms.mk_bv_const("x", 4).unwrap();
        let y = terms.mk_bv_const("y", 4).unwrap();
        let three = terms.mk_numeral(3, 4).unwrap();
        let x_is_three = terms.mk_eq(x, three).unwrap();
        let y_is_three = terms.mk_eq(y, three).unwrap();

        ctx.assert_formula(x_is_three);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));
        let bits = ctx.bit_blaster().map(|blaster| blaster.bit_count());
        assert_eq!(bits, Some(4));

        ctx.push();
        ctx.assert_formula(y_is_three);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));
        assert_eq!(ctx.bit_blaster().map(|blaster| blaster.bit_count()), Some(8));

        ctx.pop(1);
        assert_eq!(ctx.bit_blaster().map(|blaster| blaster.bit_count()), bits);
        assert!(ctx.bit_blaster().and_then(|blaster| blaster.bits_of(y)).is_none());
    }

    #[test]
    fn blaster_built_inside_scope() {
        let mut ctx = Context::from_config(Config::default());
        let terms = ctx.terms_mut();
        let x = terms.mk_bv_const("x", 4).unwrap();
        let three = terms.mk_numeral(3, 4).unwrap();
        let five = terms.mk_numeral(5, 4).unwrap();
        let x_is_three = terms.mk_eq(x, three).unwrap();
        let x_is_five = terms.mk_eq(x, five).unwrap();

        ctx.push();
        ctx.assert_formula(x_is_three);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));
        assert_eq!(ctx.bit_blaster().map(|blaster| blaster.bit_count()), Some(4));

        ctx.pop(1);
        assert_eq!(ctx.bit_blaster().map(|blaster| blaster.bit_count()), Some(0));

        ctx.assert_formula(x_is_five);
        assert_eq!(ctx.check(&[]), Ok(Report::Satisfiable));
        assert_eq!(
            ctx.model().and_then(|model| model.value_of(x)),
            Some(Value::BitVec { value: 5, width: 4 })
        );

        let (report, consequences) = ctx.consequences(&[], &[x]).unwrap();
        assert_eq!(report, Report::Satisfiable);

        let top = ctx.terms_mut().mk_true();
        let top_implies_x_is_five = ctx.terms_mut().mk_implies(top, x_is_five);
        assert_eq!(consequences, vec![top_implies_x_is_five]);
    }
}
