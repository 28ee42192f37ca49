use rustc_hash::FxHashMap;
use unicode_categories::UnicodeCategories;

/// Assigns heading text a canonical, unique, still human-readable anchor
/// slug.
///
/// Uniqueness is per instance: the anchorizer remembers every slug it has
/// handed out and suffixes repeats, so use one per output file. The HTML
/// renderer and the table-of-contents builder each run one over the same
/// document in the same order, which is what keeps their anchors in
/// agreement.
///
/// ## Example
///
/// ```
/// # use inkdown::Anchorizer;
/// let mut anchorizer = Anchorizer::new();
/// // First "stuff" is unsuffixed.
/// assert_eq!("stuff", anchorizer.anchorize("Stuff"));
/// // Second "stuff" has "-1" appended to make it unique.
/// assert_eq!("stuff-1", anchorizer.anchorize("Stuff"));
/// ```
#[derive(Debug, Default)]
pub struct Anchorizer {
    /// Slugs already issued, with the next suffix ordinal to try for
    /// each.
    issued: FxHashMap<String, usize>,
}

impl Anchorizer {
    /// Construct a new anchorizer.
    pub fn new() -> Self {
        Anchorizer::default()
    }

    /// Slug `header` the way GitHub slugs heading text — lowercased,
    /// spaces become dashes, everything that is not a letter, mark,
    /// number, dash, or connector punctuation falls out — then suffix it
    /// if an earlier heading already claimed the result.
    ///
    /// ```
    /// # use inkdown::Anchorizer;
    /// let mut anchorizer = Anchorizer::new();
    /// let source = "Ticks aren't in";
    /// assert_eq!("ticks-arent-in", anchorizer.anchorize(source));
    /// ```
    pub fn anchorize(&mut self, header: &str) -> String {
        let mut slug = String::with_capacity(header.len());
        for c in header.chars() {
            if c == ' ' {
                slug.push('-');
            } else if c == '-'
                || c.is_letter()
                || c.is_mark()
                || c.is_number()
                || c.is_punctuation_connector()
            {
                slug.extend(c.to_lowercase());
            }
        }

        let next = self.issued.get(&slug).copied().unwrap_or(0);
        if next == 0 {
            self.issued.insert(slug.clone(), 1);
            return slug;
        }

        // Probe past suffixes a literal "foo-1" heading may have taken.
        let mut n = next;
        let unique = loop {
            let candidate = format!("{}-{}", slug, n);
            if !self.issued.contains_key(&candidate) {
                break candidate;
            }
            n += 1;
        };
        self.issued.insert(slug, n + 1);
        self.issued.insert(unique.clone(), 1);
        unique
    }
}
