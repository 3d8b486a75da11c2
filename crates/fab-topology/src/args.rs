//! Flat `--key=value` argument lists as a multi-valued lookup table.

use std::collections::HashMap;

/// Arguments taken from a container's command line.
///
/// Lines without `=` are not represented. A name that repeats keeps all of
/// its values in order; lookups return the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgTable {
    args: HashMap<String, Vec<String>>,
}

impl ArgTable {
    /// Parses lines of the form `--name=value`.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args: HashMap<String, Vec<String>> = HashMap::new();

        for line in lines {
            let line = line.as_ref();
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            let name = name.trim_start_matches('-');
            args.entry(name.to_string())
                .or_default()
                .push(value.to_string());
        }

        Self { args }
    }

    /// Returns the first value of `name`, or an empty string.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.get_or_default(name, "")
    }

    /// Returns the first value of `name`, or `default` when absent.
    #[must_use]
    pub fn get_or_default<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.args
            .get(name)
            .and_then(|values| values.first())
            .map_or(default, String::as_str)
    }

    /// Returns every value recorded for `name`, in argument order.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.args.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns true if `name` was given at least once.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }
}
