use crate::types::err::ConfigError;

#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub value: T,
}

impl<T: Clone> ConfigOption<T> {
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }
}

impl<T: Clone + PartialOrd> ConfigOption<T> {
    /// Sets the value of the option, so long as the value is between the min and max of the option (inclusive).
    pub fn set(&mut self, value: T) -> Result<(), ConfigError> {
        match self.min <= value && value <= self.max {
            true => {
                self.value = value;
                Ok(())
            }
            false => Err(ConfigError::OutOfRange(self.name)),
        }
    }
}

#[cfg(test)]
mod config_option_tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let mut option = ConfigOption {
            name: "probability",
            min: 0.0,
            max: 1.0,
            value: 0.5,
        };

        assert!(option.set(1.0).is_ok());
        assert!(option.set(0.0).is_ok());
        assert_eq!(option.set(1.5), Err(ConfigError::OutOfRange("probability")));
        assert_eq!(option.value, 0.0);
    }
}
