use std::{collections::HashMap, time::Duration};

use lia_sampler::{
    builder::smtlib,
    config::{Config, Mode},
    sampler::Session,
};

/// The index and bindings of each line of a samples file.
fn read_samples(written: &str) -> Vec<(usize, HashMap<String, String>)> {
    written
        .lines()
        .map(|line| {
            let (index, bindings) = line.split_once(": ").expect("missing index");
            let bindings = bindings
                .strip_suffix(';')
                .expect("missing terminator")
                .split(';')
                .map(|binding| {
                    let (name, value) = binding.split_once(':').expect("malformed binding");
                    (name.to_owned(), value.to_owned())
                })
                .collect();
            (index.parse().expect("malformed index"), bindings)
        })
        .collect()
}

fn int(bindings: &HashMap<String, String>, name: &str) -> i64 {
    bindings[name].parse().expect("not an integer")
}

fn config(mode: Mode, samples: usize) -> Config {
    let mut config = Config::default();
    config.mode.value = mode;
    config.max_samples.value = samples;
    config.time_limit.value = Duration::from_secs(60);
    config.cdcl_timeout.value = Duration::from_secs(10);
    config.ls_timeout.value = Duration::from_secs(10);
    config.ls_max_steps.value = 50_000;
    config.var_bound.value = 1 << 12;
    config
}

fn sample(input: &str, config: Config) -> String {
    let formula = smtlib::read(input).expect("unreadable formula");
    let mut session = Session::new(formula, config, Vec::default());
    let summary = session.run().expect("sampling failed");
    let written = String::from_utf8(session.into_sink()).expect("invalid utf8");
    assert_eq!(summary.samples, written.lines().count());
    written
}

const SUM: &str = "
(declare-const x Int)
(declare-const y Int)
(assert (= (+ x y) 10))
(assert (>= x 0))
(assert (>= y 0))
";

mod complete {
    use super::*;

    #[test]
    fn distinct_indexed_samples() {
        let written = sample(SUM, config(Mode::Cdcl, 5));
        let samples = read_samples(&written);

        assert_eq!(samples.len(), 5);
        for (expected, (index, bindings)) in samples.iter().enumerate() {
            assert_eq!(*index, expected);
            assert_eq!(int(bindings, "x") + int(bindings, "y"), 10);
            assert!(int(bindings, "x") >= 0 && int(bindings, "y") >= 0);
        }

        let mut lines = written.lines().map(|line| line.split_once(": ").unwrap().1).collect::<Vec<_>>();
        lines.sort_unstable();
        lines.dedup();
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn unsatisfiable_formula() {
        let written = sample(
            "(declare-const x Int) (assert (> x 5)) (assert (< x 3))",
            config(Mode::Cdcl, 5),
        );
        assert!(written.is_empty());
    }

    #[test]
    fn exhausted_models() {
        // Only three models exist, so the complete solver eventually repeats itself until time runs out.
        let mut config = config(Mode::Cdcl, 10);
        config.time_limit.value = Duration::from_millis(500);

        let written = sample("(declare-const x Int) (assert (<= 1 x 3))", config);
        assert_eq!(read_samples(&written).len(), 3);
    }
}

mod modes {
    use super::*;

    const MIXED: &str = "
(set-logic QF_LIA)
(declare-const p Bool)
(declare-const x Int)
(declare-const y Int)
(declare-const z Int)
(assert (=> p (> x 4)))
(assert (= z (+ x y)))
(assert (<= (- 30) x 30))
(assert (<= (- 30) y 30))
(assert (distinct z 0))
(assert (or p (< y 0)))
";

    fn check_mixed(mode: Mode) {
        let written = sample(MIXED, config(mode, 8));
        let samples = read_samples(&written);
        assert!(samples.len() >= 2, "{} samples with {mode}", samples.len());

        for (_, bindings) in &samples {
            assert_eq!(bindings.len(), 4);
            let p = bindings["p"] == "true";
            let (x, y, z) = (int(bindings, "x"), int(bindings, "y"), int(bindings, "z"));
            assert!(!p || x > 4);
            assert_eq!(z, x + y);
            assert!((-30..=30).contains(&x) && (-30..=30).contains(&y));
            assert_ne!(z, 0);
            assert!(p || y < 0);
        }
    }

    #[test]
    fn complete_samples() {
        check_mixed(Mode::Cdcl);
    }

    #[test]
    fn stochastic_samples() {
        check_mixed(Mode::Ls);
    }

    #[test]
    fn hybrid_samples() {
        check_mixed(Mode::Hybrid);
    }

    #[test]
    fn dual_stochastic_samples() {
        check_mixed(Mode::LsIterative);
    }

    #[test]
    fn reproducible_with_seed() {
        for mode in [Mode::Ls, Mode::LsIterative] {
            let mut config = config(mode, 6);
            config.seed.value = 17;
            assert_eq!(sample(MIXED, config.clone()), sample(MIXED, config));
        }
    }
}

#[test]
fn hidden_variables_are_not_written() {
    let written = sample(
        "(declare-const a Bool) (declare-const b Bool) (declare-const n Int)
         (assert (xor a b)) (assert (= n (ite a 1 2)))",
        config(Mode::Cdcl, 2),
    );

    for (_, bindings) in read_samples(&written) {
        let mut names = bindings.keys().cloned().collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(names, ["a", "b", "n"]);
        assert_eq!(int(&bindings, "n"), if bindings["a"] == "true" { 1 } else { 2 });
    }
}

#[test]
fn zero_samples_requested() {
    assert!(sample(SUM, config(Mode::LsIterative, 0)).is_empty());
}
