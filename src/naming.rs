//! Identifier splitting and PascalCase normalization.
//!
//! Header cells such as `user_name`, `user name` or `userName` are mapped onto
//! the declared field name `UserName` by splitting them into words and joining
//! the words back in PascalCase.

/// Split an identifier into words on case, underscore and whitespace boundaries.
///
/// * A lowercase letter after an uppercase run of two or more letters starts a
///   new word with the last letter of the run (`"HTMLParser"` -> `["HTML", "Parser"]`).
/// * An uppercase letter after a non-uppercase word starts a new word.
/// * `_` and whitespace end the current word and are dropped.
///
/// # Examples
/// ```
/// use slashcsv::naming::split_words;
///
/// assert_eq!(split_words("user_name"), vec!["user", "name"]);
/// assert_eq!(split_words("ABCdef"), vec!["AB", "Cdef"]);
/// assert!(split_words("").is_empty());
/// ```
#[must_use]
pub fn split_words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut upper = false;

    for c in identifier.chars() {
        if c.is_lowercase() && upper && word.chars().count() > 1 {
            // the last letter of the run belongs to the next word
            let last = word.pop();
            words.push(std::mem::take(&mut word));
            word.extend(last);
            word.push(c);
            upper = false;
        } else if c.is_uppercase() && !upper && !word.is_empty() {
            words.push(std::mem::take(&mut word));
            word.push(c);
            upper = true;
        } else if c == '_' || c.is_whitespace() {
            if word.is_empty() {
                continue;
            }
            words.push(std::mem::take(&mut word));
            upper = false;
        } else {
            word.push(c);
            upper = c.is_uppercase();
        }
    }

    if !word.is_empty() {
        words.push(word);
    }
    words
}

/// Join the words of `identifier` in PascalCase.
///
/// Only the first character of each word is uppercased; the rest is kept
/// as-is, so acronyms survive (`"http_URL"` -> `"HttpURL"`).
///
/// # Examples
/// ```
/// use slashcsv::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("user_name"), "UserName");
/// assert_eq!(to_pascal_case("video id"), "VideoId");
/// assert_eq!(to_pascal_case(""), "");
/// ```
#[must_use]
pub fn to_pascal_case(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    for word in split_words(identifier) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
