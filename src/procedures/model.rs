/*!
Models, as values of the declarations asserted to a context.

A model is built on demand after a satisfiable check, and is cached until the next input to the context.

Building a model:
1. Each boolean constant of the atom map is given the value of its atom on the model of the engine.
2. If some bit-vector constant has been blasted, the bits of each constant are recombined as a value of the constant, and the bits are hidden.
3. The persistent converters of the pipeline are applied, in the order emitted.

Finally, each asserted formula is evaluated under the model, with model completion.
A formula which evaluates to false indicates some defect in lowering, and is logged as an error.

Bit-vector constants which were simplified away before blasting have no value, and under model completion evaluate to zero.
*/

use crate::{
    context::{ContextState, GenericContext},
    engine::BooleanEngine,
    misc::log::targets,
    pipeline::converters::ModelConverter,
    structures::{
        model::{Model, Value},
        term::Classification,
    },
};

impl<E: BooleanEngine> GenericContext<E> {
    /// The model of the most recent check, if the check was satisfiable and no input has been given since.
    pub fn model(&mut self) -> Option<&Model> {
        if self.model.is_none() {
            if self.state != ContextState::Satisfiable || !self.engine.model_is_current() {
                return None;
            }
            let model = self.build_model();
            self.check_model(&model);
            self.model = Some(model);
        }
        self.model.as_ref()
    }

    fn build_model(&mut self) -> Model {
        let mut model = Model::default();

        for (term, atom) in self.atom_map.iter() {
            if self.terms.classify(term) != Classification::PlainBooleanAtom {
                continue;
            }
            if let Some(value) = self.engine.value_of(atom) {
                model.register(term, Value::Bool(value));
            }
        }

        if let Some(bit_blaster) = &self.bit_blaster {
            if !bit_blaster.const2bits().is_empty() {
                ModelConverter::BitBlast(bit_blaster.const2bits().to_vec()).apply(&mut model, &mut self.powers);
            }
        }

        self.converters.apply(&mut model, &mut self.powers);
        log::trace!(target: targets::MODEL, "Model with {} declarations", model.len());
        model
    }

    fn check_model(&self, model: &Model) {
        for formula in self.formula_log.formulas() {
            if let Some(Value::Bool(false)) = model.eval(&self.terms, *formula, true) {
                log::error!(target: targets::MODEL, "Formula {} is false on the model", self.terms.display(*formula));
                debug_assert!(false, "formula false on the model");
            }
        }
    }
}
