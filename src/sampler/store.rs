/*!
The store of samples, and the single point at which samples are written.

A model offered to the store is canonicalised, and is written only if the fingerprint of the sample is new.
Written samples are indexed from zero, in order of writing, one per line:

```text
0: x:3;y:7;
1: x:-2;y:12;
```
*/

use std::{collections::HashSet, io::Write};

use crate::{
    misc::log::targets::{self},
    sampler::canonical::{self},
    structures::model::{Model, VarOrder},
    types::err::{self, ErrorKind},
};

/// The result of offering a model to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    /// The sample was new, and was written with the given index.
    Fresh(usize),

    /// The sample shared a fingerprint with some written sample, and was not written.
    Duplicate,
}

pub struct SampleStore<W: Write> {
    seen: HashSet<u64>,
    count: usize,
    sink: W,
}

impl<W: Write> SampleStore<W> {
    pub fn new(sink: W) -> Self {
        SampleStore {
            seen: HashSet::default(),
            count: 0,
            sink,
        }
    }

    /// The count of samples written.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Canonicalises the model and writes the sample, if new.
    ///
    /// Errors if the model contains a malformed value, or if writing fails.
    pub fn offer(&mut self, model: &Model, order: &VarOrder) -> Result<Offer, ErrorKind> {
        let sample = canonical::canonicalize(model, order)?;

        if !self.seen.insert(sample.fingerprint()) {
            log::trace!(target: targets::STORE, "Duplicate {:x}", sample.fingerprint());
            return Ok(Offer::Duplicate);
        }

        let index = self.count;
        if let Err(e) = writeln!(self.sink, "{index}: {sample}") {
            return Err(err::IOError::Write(e.kind()).into());
        }
        self.count += 1;

        log::debug!(target: targets::STORE, "Sample {index} written");
        Ok(Offer::Fresh(index))
    }

    pub fn flush(&mut self) -> Result<(), ErrorKind> {
        self.sink
            .flush()
            .map_err(|e| err::IOError::Write(e.kind()).into())
    }

    /// The sink, consuming the store.
    pub fn into_sink(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;
    use crate::structures::model::Value;

    fn model(x: i64, y: i64) -> Model {
        let mut model = Model::default();
        model.push("x", Value::from(x));
        model.push("y", Value::from(y));
        model
    }

    #[test]
    fn duplicates_are_not_written() {
        let order = VarOrder::new(["x", "y"].map(String::from));
        let mut store = SampleStore::new(Vec::default());

        assert_eq!(store.offer(&model(1, 2), &order), Ok(Offer::Fresh(0)));
        assert_eq!(store.offer(&model(1, 2), &order), Ok(Offer::Duplicate));
        assert_eq!(store.offer(&model(-3, 2), &order), Ok(Offer::Fresh(1)));
        assert_eq!(store.count(), 2);

        let written = String::from_utf8(store.into_sink()).unwrap();
        assert_eq!(written, "0: x:1;y:2;\n1: x:-3;y:2;\n");
    }

    #[test]
    fn malformed_models_are_errors() {
        let order = VarOrder::new(["x".to_owned()]);
        let mut store = SampleStore::new(Vec::default());
        let mut model = Model::default();
        model.push("x", "1/2");

        assert!(matches!(
            store.offer(&model, &order),
            Err(ErrorKind::Parse(err::ParseError::ModelLiteral(_)))
        ));
        assert_eq!(store.count(), 0);
    }
}
