use rand::Rng;
use reqwest::header::HeaderValue;

use crate::error::ValidationError;

/// One entry of the identity catalog, validated as a header value up front.
#[derive(Debug, Clone)]
pub struct Identity {
    text: String,
    header: HeaderValue,
}

impl Identity {
    /// # Errors
    ///
    /// Returns an error when the text cannot be sent as a header value.
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        let header = HeaderValue::from_str(text).map_err(|_err| ValidationError::InvalidIdentity {
            value: text.to_owned(),
        })?;
        Ok(Self {
            text: text.to_owned(),
            header,
        })
    }

    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.text.as_str()
    }

    #[must_use]
    pub const fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

/// Non-empty, ordered set of identity strings attached to requests to
/// diversify traffic. The catalog is always supplied by configuration; the
/// CLI only falls back to a built-in list when none is given.
#[derive(Debug, Clone)]
pub struct IdentityCatalog {
    first: Identity,
    rest: Vec<Identity>,
}

impl IdentityCatalog {
    /// # Errors
    ///
    /// Returns an error when `entries` is empty or an entry is not a valid
    /// header value.
    pub fn new<I, S>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut identities = entries
            .into_iter()
            .map(|entry| Identity::new(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();
        let first = identities
            .next()
            .ok_or(ValidationError::EmptyIdentityCatalog)?;
        Ok(Self {
            first,
            rest: identities.collect(),
        })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rest.len().saturating_add(1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Picks one entry uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Identity {
        let index = rng.gen_range(0..self.len());
        match index.checked_sub(1) {
            None => &self.first,
            Some(rest_index) => self.rest.get(rest_index).unwrap_or(&self.first),
        }
    }
}
