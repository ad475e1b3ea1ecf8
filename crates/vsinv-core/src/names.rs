// ── Node-name generator ──
//
// Candidates are `<left>-<right>` pairs drawn uniformly (with replacement)
// from two word lists. A candidate collides with a known name equal to it
// or starting with `<candidate>.`, so `amber-fox` is taken by
// `amber-fox.example.com` but not by `amber-foxglove`.

use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::CoreError;

/// Draws attempted before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// One side of the name space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// One word per line; trailing whitespace is trimmed and blank lines
    /// are skipped.
    pub fn parse(text: &str) -> Self {
        Self {
            words: text
                .lines()
                .map(str::trim_end)
                .filter(|w| !w.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::Config {
            message: format!("cannot read word list {}: {e}", path.display()),
        })?;
        let list = Self::parse(&text);
        debug!(path = %path.display(), words = list.len(), "loaded word list");
        Ok(list)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for WordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Whether `candidate` is already taken by one of `known`.
pub fn collides(known: &[String], candidate: &str) -> bool {
    known.iter().any(|name| {
        name.strip_prefix(candidate)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}

/// Generate a name not used by any of `known`, using the thread RNG.
pub fn generate_unique_name(
    known: &[String],
    lefts: &WordList,
    rights: &WordList,
    max_attempts: usize,
) -> Result<String, CoreError> {
    generate_unique_name_with(&mut rand::thread_rng(), known, lefts, rights, max_attempts)
}

/// Generate a name with an explicit random source.
///
/// Returns [`CoreError::NameSpaceExhausted`] after `max_attempts` colliding
/// draws.
pub fn generate_unique_name_with<R: Rng + ?Sized>(
    rng: &mut R,
    known: &[String],
    lefts: &WordList,
    rights: &WordList,
    max_attempts: usize,
) -> Result<String, CoreError> {
    for attempt in 1..=max_attempts {
        let (Some(left), Some(right)) = (lefts.words.choose(rng), rights.words.choose(rng)) else {
            let side = if lefts.is_empty() { "left" } else { "right" };
            return Err(CoreError::EmptyWordList { side });
        };

        let candidate = format!("{left}-{right}");
        if !collides(known, &candidate) {
            return Ok(candidate);
        }
        debug!(attempt, candidate = %candidate, "name taken");
    }

    Err(CoreError::NameSpaceExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn known(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn parse_trims_and_skips_blank_lines() {
        let list = WordList::parse("amber  \n\n  \nfox\r\ncopper\t\n");
        assert_eq!(list.words(), ["amber", "fox", "copper"]);
    }

    #[test]
    fn reads_word_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lefts.txt");
        std::fs::write(&path, "red\nblue\n").unwrap();

        let list = WordList::from_file(&path).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn missing_word_list_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WordList::from_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn collision_rules() {
        let names = known(&["amber-fox.example.com", "red-owl", "blue-cat-2"]);
        assert!(collides(&names, "amber-fox"));
        assert!(collides(&names, "red-owl"));
        assert!(!collides(&names, "blue-cat"));
        assert!(!collides(&names, "amber-fo"));
        assert!(!collides(&[], "anything"));
    }

    #[test]
    fn single_pair_is_deterministic() {
        let lefts: WordList = ["amber"].into_iter().collect();
        let rights: WordList = ["fox"].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(7);

        let name = generate_unique_name_with(&mut rng, &[], &lefts, &rights, 10).unwrap();
        assert_eq!(name, "amber-fox");
    }

    #[test]
    fn result_never_collides() {
        let lefts: WordList = ["amber", "red"].into_iter().collect();
        let rights: WordList = ["fox", "owl"].into_iter().collect();
        let taken = known(&["amber-fox", "amber-owl.lab", "red-fox"]);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            match generate_unique_name_with(&mut rng, &taken, &lefts, &rights, 10) {
                Ok(name) => assert_eq!(name, "red-owl"),
                Err(CoreError::NameSpaceExhausted { attempts }) => assert_eq!(attempts, 10),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn exhausted_after_max_attempts() {
        let lefts: WordList = ["amber"].into_iter().collect();
        let rights: WordList = ["fox"].into_iter().collect();
        let taken = known(&["amber-fox.example.com"]);

        let err = generate_unique_name_with(&mut StdRng::seed_from_u64(1), &taken, &lefts, &rights, 3)
            .unwrap_err();
        assert!(matches!(err, CoreError::NameSpaceExhausted { attempts: 3 }));
        assert_eq!(
            err.to_string(),
            "Failed to generate a new, unique, name after 3 attempts"
        );
    }

    #[test]
    fn empty_word_list_is_an_error() {
        let rights: WordList = ["fox"].into_iter().collect();
        let err = generate_unique_name(&[], &WordList::default(), &rights, DEFAULT_MAX_ATTEMPTS)
            .unwrap_err();
        assert!(matches!(err, CoreError::EmptyWordList { side: "left" }));
    }
}
