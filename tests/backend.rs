//! Sessions over a scripted backend, whose solvers return a fixed sequence of results.

use std::{cell::RefCell, collections::VecDeque, rc::Rc, time::Duration};

use num_bigint::BigInt;

use lia_sampler::{
    builder::{preprocess::Subgoal, smtlib},
    config::{Config, Mode},
    reports::Report,
    sampler::Session,
    solvers::{Backend, Solver, StochasticSolver},
    structures::{
        formula::Formula,
        model::{Model, Pin, Value},
    },
};

#[derive(Default)]
struct Script {
    /// Results of checks, in order, shared by every solver of the backend.
    results: VecDeque<Option<Model>>,

    /// The pins of each check, in order.
    pins: Vec<Vec<Pin>>,

    reseeds: usize,

    /// A pause for each check.
    delay: Duration,
}

#[derive(Clone, Default)]
struct Scripted {
    script: Rc<RefCell<Script>>,
}

struct ScriptedSolver {
    script: Rc<RefCell<Script>>,
    model: Option<Model>,
}

impl Solver for ScriptedSolver {
    fn check(&mut self, pins: &[Pin]) -> Report {
        let mut script = self.script.borrow_mut();
        std::thread::sleep(script.delay);
        script.pins.push(pins.to_vec());

        self.model = script.results.pop_front().flatten();
        match self.model {
            Some(_) => Report::Satisfiable,
            None => Report::Unknown,
        }
    }

    fn model(&self) -> Option<Model> {
        self.model.clone()
    }
}

impl StochasticSolver for ScriptedSolver {
    fn reseed(&mut self, _seed: u64) {
        self.script.borrow_mut().reseeds += 1;
    }
}

impl Backend for Scripted {
    type Complete = ScriptedSolver;
    type Stochastic = ScriptedSolver;

    fn simplify(&self, formula: &Formula) -> Subgoal {
        Subgoal::identity(formula.clone())
    }

    fn complete_solver(&self, _formula: &Formula, _seed: u64) -> Self::Complete {
        ScriptedSolver {
            script: self.script.clone(),
            model: None,
        }
    }

    fn stochastic_solver(&self, _subgoal: &Subgoal, _seed: u64) -> Self::Stochastic {
        ScriptedSolver {
            script: self.script.clone(),
            model: None,
        }
    }
}

fn xy(x: i64, y: bool) -> Option<Model> {
    let mut model = Model::default();
    model.push("y", Value::from(y));
    model.push("x", Value::from(x));
    Some(model)
}

fn formula() -> Formula {
    smtlib::read("(declare-const x Int) (declare-const y Bool)").unwrap()
}

fn config(mode: Mode, samples: usize) -> Config {
    let mut config = Config::default();
    config.mode.value = mode;
    config.max_samples.value = samples;
    config.time_limit.value = Duration::from_secs(30);
    config.fixed_var_pct.value = 1.0;
    config
}

fn run(config: Config, backend: &Scripted) -> String {
    let mut session = Session::with_backend(formula(), config, Vec::default(), backend.clone());
    session.run().unwrap();
    String::from_utf8(session.into_sink()).unwrap()
}

fn pin(name: &str, value: i64) -> Pin {
    Pin {
        name: name.to_owned(),
        value: BigInt::from(value),
    }
}

#[test]
fn prefix_negatives_are_normalised() {
    let backend = Scripted::default();
    backend.script.borrow_mut().results = [xy(-42, true), xy(7, false)].into();

    let written = run(config(Mode::Ls, 2), &backend);
    assert_eq!(written, "0: x:-42;y:true;\n1: x:7;y:false;\n");
}

#[test]
fn duplicates_are_skipped() {
    let backend = Scripted::default();
    backend.script.borrow_mut().results = [xy(1, true), xy(1, true), None, xy(2, true)].into();

    let written = run(config(Mode::Ls, 2), &backend);
    assert_eq!(written, "0: x:1;y:true;\n1: x:2;y:true;\n");
    assert_eq!(backend.script.borrow().reseeds, 4);
}

#[test]
fn complete_failure_is_terminal() {
    let backend = Scripted::default();
    backend.script.borrow_mut().results = [xy(1, true), None, xy(2, true)].into();

    let written = run(config(Mode::Cdcl, 10), &backend);
    assert_eq!(written, "0: x:1;y:true;\n");
    assert_eq!(backend.script.borrow().results.len(), 1);
}

#[test]
fn failed_attempts_respect_time() {
    let backend = Scripted::default();
    backend.script.borrow_mut().delay = Duration::from_millis(5);

    let mut config = config(Mode::Ls, 10);
    config.time_limit.value = Duration::from_millis(50);

    let written = run(config, &backend);
    assert!(written.is_empty());
    assert!(backend.script.borrow().pins.len() >= 5);
}

#[test]
fn hybrid_pins_complete_checks() {
    let backend = Scripted::default();
    backend.script.borrow_mut().results = [
        // A burst of two complete checks, unpinned.
        xy(1, true),
        xy(2, true),
        // A stochastic attempt.
        xy(-3, false),
        // A burst of complete checks, pinned by the stochastic model.
        xy(-3, true),
    ]
    .into();

    let mut config = config(Mode::Hybrid, 4);
    config.cdcl_epoch.value = 2;

    let written = run(config, &backend);
    assert_eq!(written.lines().count(), 4);

    let script = backend.script.borrow();
    assert_eq!(script.pins, vec![vec![], vec![], vec![], vec![pin("x", -3)]]);
    assert_eq!(script.reseeds, 1);
}

#[test]
fn hybrid_burst_failures_continue() {
    let backend = Scripted::default();
    backend.script.borrow_mut().results = [None, xy(1, true), xy(2, false)].into();

    let mut config = config(Mode::Hybrid, 2);
    config.cdcl_epoch.value = 2;

    let written = run(config, &backend);
    assert_eq!(written, "0: x:1;y:true;\n1: x:2;y:false;\n");
}

#[test]
fn dual_stochastic_pins_second_solver() {
    let backend = Scripted::default();
    backend.script.borrow_mut().results = [
        // Pinned, though with no pins as no free model is known.
        xy(1, true),
        // Free.
        xy(2, false),
        // Pinned by the free model.
        xy(2, true),
        // Free.
        xy(5, true),
    ]
    .into();

    let written = run(config(Mode::LsIterative, 4), &backend);
    assert_eq!(written.lines().count(), 4);

    let script = backend.script.borrow();
    assert_eq!(script.pins, vec![vec![], vec![], vec![pin("x", 2)], vec![]]);
    assert_eq!(script.reseeds, 2);
}

#[test]
fn malformed_model_is_fatal() {
    let backend = Scripted::default();
    let mut model = Model::default();
    model.push("x", "(/ 1 2)");
    backend.script.borrow_mut().results = [xy(1, true), Some(model), xy(2, true)].into();

    let mut session = Session::with_backend(formula(), config(Mode::Ls, 5), Vec::default(), backend.clone());
    assert!(session.run().is_err());
    assert_eq!(session.samples(), 1);
    assert_eq!(String::from_utf8(session.into_sink()).unwrap(), "0: x:1;y:true;\n");
}
