use core::fmt;

use serde::{Deserialize, Serialize};

use super::intern::{Interner, StringId};

const DELIMITERS: &[char] = &[' ', '\n'];

#[derive(PartialEq, Clone, Copy, Serialize, Deserialize, Debug)]
pub enum Token {
    Integer(i32),
    Real(f32),
    Symbol(StringId),
}

/// Tag of a [`Token`], used in diagnostics.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Kind {
    Integer,
    Real,
    Symbol,
}

impl Token {
    pub fn kind(&self) -> Kind {
        match self {
            Token::Integer(_) => Kind::Integer,
            Token::Real(_) => Kind::Real,
            Token::Symbol(_) => Kind::Symbol,
        }
    }
}

impl From<i32> for Token {
    fn from(val: i32) -> Self {
        Self::Integer(val)
    }
}

impl From<f32> for Token {
    fn from(val: f32) -> Self {
        Self::Real(val)
    }
}

impl From<StringId> for Token {
    fn from(id: StringId) -> Self {
        Self::Symbol(id)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Integer => "integer",
            Kind::Real => "real",
            Kind::Symbol => "symbol",
        };
        f.write_str(name)
    }
}

fn is_integer(word: &str) -> bool {
    word.bytes().all(|b| b.is_ascii_digit())
}

// digits with exactly one decimal point; a lone "." stays a word
fn is_real(word: &str) -> bool {
    let mut points = 0;
    let mut digits = 0;
    for b in word.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => points += 1,
            _ => return false,
        }
    }
    points == 1 && digits > 0
}

// wraps like a 32 bit accumulator instead of failing on overflow
fn parse_integer(word: &str) -> i32 {
    word.bytes().fold(0i32, |acc, b| {
        acc.wrapping_mul(10).wrapping_add((b - b'0') as i32)
    })
}

/// Classifies a single word, interning it when it is neither an integer nor a
/// real literal. `word` must not be empty.
pub fn classify(word: &str, interner: &mut Interner) -> Token {
    if is_integer(word) {
        Token::Integer(parse_integer(word))
    } else if is_real(word) {
        match word.parse::<f32>() {
            Ok(real) => Token::Real(real),
            Err(_) => Token::Symbol(interner.intern(word)),
        }
    } else {
        Token::Symbol(interner.intern(word))
    }
}

/// Splits `fragment` on spaces and newlines and classifies each word in order.
pub fn tokenize(fragment: &str, interner: &mut Interner) -> Vec<Token> {
    fragment
        .split(DELIMITERS)
        .filter(|word| !word.is_empty())
        .map(|word| classify(word, interner))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_mixed() {
        let mut interner = Interner::new();
        let tokens = tokenize("12 3.5 foo", &mut interner);
        let foo = interner.lookup("foo").unwrap();
        assert_eq!(
            tokens,
            [Token::Integer(12), Token::Real(3.5), Token::Symbol(foo)]
        );
    }

    #[test]
    fn test_empty_fragment() {
        let mut interner = Interner::new();
        assert!(tokenize("", &mut interner).is_empty());
        assert!(tokenize("  \n \n", &mut interner).is_empty());
        assert!(interner.is_empty());
    }

    #[test]
    fn test_only_space_and_newline_split() {
        let mut interner = Interner::new();
        let tokens = tokenize("1\n2  dup dup\tdup", &mut interner);
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::Integer(1));
        assert_eq!(tokens[1], Token::Integer(2));
        assert_eq!(tokens[2], Token::Symbol(interner.lookup("dup").unwrap()));
        // tabs are part of the word
        assert_eq!(
            tokens[3],
            Token::Symbol(interner.lookup("dup\tdup").unwrap())
        );
    }

    #[test]
    fn test_real_shapes() {
        let mut interner = Interner::new();
        assert_eq!(classify("3.", &mut interner), Token::Real(3.0));
        assert_eq!(classify(".5", &mut interner), Token::Real(0.5));
        assert_eq!(classify("0.25", &mut interner), Token::Real(0.25));
        assert_eq!(classify("1.2.3", &mut interner).kind(), Kind::Symbol);
        assert_eq!(classify("-1", &mut interner).kind(), Kind::Symbol);
        assert_eq!(classify("1e5", &mut interner).kind(), Kind::Symbol);
    }

    #[test]
    fn test_dots_only_are_symbols() {
        let mut interner = Interner::new();
        for word in [".", "..", "..."] {
            let token = classify(word, &mut interner);
            assert_eq!(token, Token::Symbol(interner.lookup(word).unwrap()));
        }
    }

    #[test]
    fn test_integer_wraps() {
        let mut interner = Interner::new();
        assert_eq!(classify("2147483647", &mut interner), Token::Integer(i32::MAX));
        assert_eq!(classify("2147483648", &mut interner), Token::Integer(i32::MIN));
        assert_eq!(classify("007", &mut interner), Token::Integer(7));
    }

    #[test]
    fn test_symbols_share_ids() {
        let mut interner = Interner::new();
        let tokens = tokenize("dup 1 dup", &mut interner);
        assert_eq!(tokens[0], tokens[2]);
        assert_eq!(interner.len(), 1);
    }
}
