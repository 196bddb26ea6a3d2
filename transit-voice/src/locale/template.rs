//! Named-slot string templates.
//!
//! Templates look like `"The next departure from {from} is: {list}."`.
//! `{{` and `}}` stand for literal braces.

/// Why a template string could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unclosed '{{' at byte {0}")]
    Unclosed(usize),

    #[error("stray '}}' at byte {0}")]
    StrayClose(usize),

    #[error("empty slot name at byte {0}")]
    EmptySlot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Slot(String),
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Compile a template string.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_voice::locale::Template;
    ///
    /// let t = Template::parse("{name}, {distance} meters away").unwrap();
    /// assert_eq!(t.render(&[("name", "Zurich HB"), ("distance", "2")]), "Zurich HB, 2 meters away");
    ///
    /// assert!(Template::parse("{oops").is_err());
    /// ```
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    text.push('}');
                }
                '}' => return Err(TemplateError::StrayClose(at)),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) | None => return Err(TemplateError::Unclosed(at)),
                            Some((_, c)) => name.push(c),
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(TemplateError::EmptySlot(at));
                    }
                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Slot(name.to_string()));
                }
                c => text.push(c),
            }
        }

        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }

        Ok(Self { pieces })
    }

    /// Slot names referenced by the template, in order of appearance.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Slot(name) => Some(name.as_str()),
            Piece::Text(_) => None,
        })
    }

    /// Fill the slots from `args`.
    ///
    /// A slot without a matching argument is rendered as `{name}` so the gap
    /// is audible rather than silently dropped.
    pub fn render(&self, args: &[(&str, &str)]) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Slot(name) => {
                    match args.iter().find(|(key, _)| key == name) {
                        Some((_, value)) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text() {
        let t = Template::parse("I need your location.").unwrap();
        assert_eq!(t.render(&[]), "I need your location.");
        assert_eq!(t.slots().count(), 0);
    }

    #[test]
    fn slots_in_order() {
        let t = Template::parse("{vehicle} departing{platform} at {time} to {to}").unwrap();
        assert_eq!(
            t.slots().collect::<Vec<_>>(),
            vec!["vehicle", "platform", "time", "to"]
        );
    }

    #[test]
    fn repeated_slot() {
        let t = Template::parse("{a}-{a}").unwrap();
        assert_eq!(t.render(&[("a", "x")]), "x-x");
    }

    #[test]
    fn escaped_braces() {
        let t = Template::parse("{{literal}} {x}").unwrap();
        assert_eq!(t.render(&[("x", "1")]), "{literal} 1");
    }

    #[test]
    fn missing_argument_stays_visible() {
        let t = Template::parse("to {to}").unwrap();
        assert_eq!(t.render(&[]), "to {to}");
    }

    #[test]
    fn empty_argument_collapses() {
        let t = Template::parse("on-time{platform} at").unwrap();
        assert_eq!(t.render(&[("platform", "")]), "on-time at");
    }

    #[test]
    fn malformed() {
        assert_eq!(Template::parse("{to"), Err(TemplateError::Unclosed(0)));
        assert_eq!(Template::parse("a {b{c}"), Err(TemplateError::Unclosed(2)));
        assert_eq!(Template::parse("a } b"), Err(TemplateError::StrayClose(2)));
        assert_eq!(Template::parse("{ }"), Err(TemplateError::EmptySlot(0)));
    }

    #[test]
    fn non_ascii_text() {
        let t = Template::parse("Die nächste Abfahrt von {from} ist: {list}.").unwrap();
        assert_eq!(
            t.render(&[("from", "Zürich"), ("list", "…")]),
            "Die nächste Abfahrt von Zürich ist: …."
        );
    }
}
