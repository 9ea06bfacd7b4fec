/*!
Model converters, aka. the recipes which turn a model over the atoms of a lowered goal into a model over the declarations of the caller.

There are two converters:
- [Filter](ModelConverter::Filter) hides auxiliary constants introduced by some stage.
- [BitBlast](ModelConverter::BitBlast) combines the bits of each bit-vector constant into a value, and hides the bits.

A context keeps a persistent [ConverterChain], to which stages may append.
The chain is truncated when a scope is popped, to the length recorded when the scope was opened.

The bit-blast converter is not kept on the chain.
Instead, a bit-blast converter is built from the (scope-aware) map of the [bit-blaster](crate::pipeline::bit_blast::BitBlaster) whenever a model is built, and is applied before the chain.

```rust
# use otter_inc::pipeline::converters::{ModelConverter, PowerTable};
# use otter_inc::structures::model::{Model, Value};
# use otter_inc::structures::term::TermManager;
let mut terms = TermManager::default();
let x = terms.mk_bv_const("x", 3).unwrap();
let bits = (0..3).map(|_| terms.mk_fresh_bool("x")).collect::<Vec<_>>();

let mut model = Model::default();
model.register(bits[0], Value::Bool(true));
model.register(bits[2], Value::Bool(true));

let converter = ModelConverter::BitBlast(vec![(x, bits)]);
converter.apply(&mut model, &mut PowerTable::default());

assert_eq!(model.value_of(x), Some(Value::BitVec { value: 5, width: 3 }));
assert_eq!(model.len(), 1);
```
*/

use crate::{
    misc::log::targets,
    structures::{
        model::{Model, Value},
        term::Term,
    },
};

/// The powers of two, extended on demand.
#[derive(Clone, Debug)]
pub struct PowerTable {
    powers: Vec<u64>,
}

impl Default for PowerTable {
    fn default() -> Self {
        PowerTable { powers: vec![1] }
    }
}

impl PowerTable {
    /// 2^index.
    pub fn power(&mut self, index: usize) -> u64 {
        while self.powers.len() <= index {
            let last = self.powers[self.powers.len() - 1];
            self.powers.push(last.wrapping_mul(2));
        }
        self.powers[index]
    }

    /// The sum of the powers of each true bit, from least significant to most significant.
    pub fn value_of(&mut self, bits: impl IntoIterator<Item = bool>) -> u64 {
        bits.into_iter()
            .enumerate()
            .filter(|(_, bit)| *bit)
            .fold(0, |sum, (index, _)| sum.wrapping_add(self.power(index)))
    }
}

/// A transformation of a model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelConverter {
    /// Hides each of the constants.
    Filter(Vec<Term>),

    /// The bits of each bit-vector constant, least significant first.
    BitBlast(Vec<(Term, Vec<Term>)>),
}

impl ModelConverter {
    pub fn apply(&self, model: &mut Model, powers: &mut PowerTable) {
        match self {
            ModelConverter::Filter(hidden) => {
                for term in hidden {
                    model.hide(*term);
                }
            }

            ModelConverter::BitBlast(const2bits) => {
                for (constant, bits) in const2bits {
                    let values = bits
                        .iter()
                        .map(|bit| {
                            matches!(model.value_of(*bit), Some(Value::Bool(true)))
                        })
                        .collect::<Vec<_>>();
                    let value = powers.value_of(values);
                    log::trace!(target: targets::MODEL, "Bit-vector value {value} from {} bits", bits.len());

                    for bit in bits {
                        model.hide(*bit);
                    }
                    model.register(
                        *constant,
                        Value::BitVec {
                            value,
                            width: bits.len() as u32,
                        },
                    );
                }
            }
        }
    }
}

/// The persistent converters of a context, in the order emitted.
#[derive(Clone, Debug, Default)]
pub struct ConverterChain {
    converters: Vec<ModelConverter>,
}

impl ConverterChain {
    pub fn push(&mut self, converter: ModelConverter) {
        self.converters.push(converter);
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Removes every converter emitted after the checkpoint.
    pub fn truncate(&mut self, checkpoint: usize) {
        self.converters.truncate(checkpoint);
    }

    /// Applies each converter, in the order emitted.
    pub fn apply(&self, model: &mut Model, powers: &mut PowerTable) {
        for converter in &self.converters {
            converter.apply(model, powers);
        }
    }
}

#[cfg(test)]
mod converter_tests {
    use super::*;
    use crate::structures::term::TermManager;

    #[test]
    fn powers() {
        let mut table = PowerTable::default();
        assert_eq!(table.power(0), 1);
        assert_eq!(table.power(10), 1024);
        assert_eq!(table.power(63), 1 << 63);
        assert_eq!(table.value_of([false, true, true]), 6);
    }

    #[test]
    fn missing_bits_are_false() {
        let mut terms = TermManager::default();
        let x = terms.mk_bv_const("x", 2).unwrap();
        let bits = vec![terms.mk_fresh_bool("x"), terms.mk_fresh_bool("x")];

        let mut model = Model::default();
        model.register(bits[1], Value::Bool(true));

        ModelConverter::BitBlast(vec![(x, bits.clone())]).apply(&mut model, &mut PowerTable::default());
        assert_eq!(model.value_of(x), Some(Value::BitVec { value: 2, width: 2 }));
        assert_eq!(model.value_of(bits[1]), None);
    }

    #[test]
    fn chain_truncation() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");

        let mut chain = ConverterChain::default();
        chain.push(ModelConverter::Filter(vec![p]));
        let checkpoint = chain.len();
        chain.push(ModelConverter::Filter(vec![q]));
        chain.truncate(checkpoint);

        let mut model = Model::default();
        model.register(p, Value::Bool(true));
        model.register(q, Value::Bool(false));
        chain.apply(&mut model, &mut PowerTable::default());

        assert_eq!(model.value_of(p), None);
        assert_eq!(model.value_of(q), Some(Value::Bool(false)));
    }
}
