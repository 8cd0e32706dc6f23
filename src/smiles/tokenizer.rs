use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond(BondToken),
    RingClosure {
        bond: Option<BondToken>,
        digit: u16,
        pos: usize,
    },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

/// An atom as written, before any graph is built.
///
/// `hcount` is `None` for organic-subset atoms (implicit hydrogens are
/// filled in later) and always `Some` for bracket atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub atom_class: Option<u32>,
    pub is_bracket: bool,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondToken {
    fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            // stereo markers only; the bond itself is single
            '-' | '/' | '\\' => BondToken::Single,
            '=' => BondToken::Double,
            '#' => BondToken::Triple,
            '$' => BondToken::Quadruple,
            ':' => BondToken::Aromatic,
            _ => return None,
        })
    }
}

const AROMATIC_PAIRS: [(&str, Element); 3] =
    [("se", Element::Se), ("te", Element::Te), ("as", Element::As)];

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let mut lexer = Lexer::new(input);
    while let Some(ch) = lexer.peek() {
        lexer.step(ch)?;
    }
    Ok(lexer.tokens)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn eat(&mut self, ch: char) -> bool {
        let hit = self.peek() == Some(ch);
        if hit {
            self.pos += 1;
        }
        hit
    }

    /// Reads a run of ASCII digits. Values too large for `u64` saturate so
    /// that the caller's narrowing conversion reports the overflow.
    fn number(&mut self) -> Option<u64> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(u64::from(d));
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn step(&mut self, ch: char) -> Result<(), SmilesError> {
        let at = self.pos;
        match ch {
            c if c.is_ascii_whitespace() => self.pos += 1,
            '[' => {
                let atom = self.bracket_atom()?;
                self.tokens.push(Token::Atom(atom));
            }
            '(' => self.push_at(Token::OpenParen(at)),
            ')' => self.push_at(Token::CloseParen(at)),
            '.' => self.push_at(Token::Dot(at)),
            '-' if !self.bond_allowed() => {
                return Err(SmilesError::UnexpectedChar { pos: at, ch });
            }
            '%' => {
                self.pos += 1;
                let digit = self.percent_ring(at)?;
                self.ring_closure(digit, at);
            }
            '0'..='9' => {
                self.pos += 1;
                self.ring_closure(ch as u16 - '0' as u16, at);
            }
            _ => {
                if let Some(bond) = BondToken::from_char(ch) {
                    self.push_at(Token::Bond(bond));
                } else {
                    let atom = self.organic_atom(ch)?;
                    self.tokens.push(Token::Atom(atom));
                }
            }
        }
        Ok(())
    }

    fn push_at(&mut self, token: Token) {
        self.tokens.push(token);
        self.pos += 1;
    }

    fn bond_allowed(&self) -> bool {
        matches!(
            self.tokens.last(),
            Some(Token::Atom(_) | Token::RingClosure { .. } | Token::OpenParen(_) | Token::CloseParen(_))
        )
    }

    /// A bond written right before a ring digit belongs to the closure.
    fn ring_closure(&mut self, digit: u16, pos: usize) {
        let bond = match self.tokens.last() {
            Some(&Token::Bond(b)) => {
                self.tokens.pop();
                Some(b)
            }
            _ => None,
        };
        self.tokens.push(Token::RingClosure { bond, digit, pos });
    }

    fn percent_ring(&mut self, at: usize) -> Result<u16, SmilesError> {
        let bad = SmilesError::UnexpectedChar { pos: at, ch: '%' };
        if self.eat('(') {
            let value = self.number().ok_or_else(|| bad.clone())?;
            if !self.eat(')') {
                return Err(bad);
            }
            return u16::try_from(value).map_err(|_| bad);
        }
        match (self.peek().and_then(|c| c.to_digit(10)), self.peek_next().and_then(|c| c.to_digit(10))) {
            (Some(tens), Some(ones)) => {
                self.pos += 2;
                Ok((tens * 10 + ones) as u16)
            }
            _ => Err(bad),
        }
    }

    fn organic_atom(&mut self, ch: char) -> Result<AtomToken, SmilesError> {
        let at = self.pos;
        let (element, aromatic, width) = match (ch, self.peek_next()) {
            ('B', Some('r')) => (Element::Br, false, 2),
            ('C', Some('l')) => (Element::Cl, false, 2),
            ('*', _) => (Element::Wildcard, false, 1),
            ('B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I', _) => {
                (symbol_element(&ch.to_string(), at)?, false, 1)
            }
            ('b' | 'c' | 'n' | 'o' | 'p' | 's', _) => {
                (symbol_element(&ch.to_ascii_uppercase().to_string(), at)?, true, 1)
            }
            _ => return Err(SmilesError::UnexpectedChar { pos: at, ch }),
        };
        self.pos += width;
        Ok(AtomToken {
            element,
            is_aromatic: aromatic,
            isotope: 0,
            hcount: None,
            charge: 0,
            atom_class: None,
            is_bracket: false,
            pos: at,
        })
    }

    fn bracket_atom(&mut self) -> Result<AtomToken, SmilesError> {
        let open = self.pos;
        self.pos += 1;

        let isotope = match self.number() {
            Some(n) => u16::try_from(n).map_err(|_| SmilesError::InvalidIsotope { pos: open + 1 })?,
            None => 0,
        };
        let (element, is_aromatic) = self.bracket_symbol(open)?;
        // tetrahedral markers carry no connectivity
        while self.eat('@') {}
        let hcount = if self.eat('H') {
            self.number().map_or(1, |n| u8::try_from(n).unwrap_or(u8::MAX))
        } else {
            0
        };
        let charge = self.charge(open)?;
        let atom_class = self.atom_class()?;

        if !self.eat(']') {
            return Err(SmilesError::UnclosedBracket { pos: open });
        }
        Ok(AtomToken {
            element,
            is_aromatic,
            isotope,
            hcount: Some(hcount),
            charge,
            atom_class,
            is_bracket: true,
            pos: open,
        })
    }

    fn bracket_symbol(&mut self, open: usize) -> Result<(Element, bool), SmilesError> {
        let at = self.pos;
        let first = self.peek().ok_or(SmilesError::UnclosedBracket { pos: open })?;
        let second = self.peek_next();

        if first == '*' {
            self.pos += 1;
            return Ok((Element::Wildcard, false));
        }

        if first.is_ascii_lowercase() {
            let pair: String = [Some(first), second].into_iter().flatten().collect();
            if let Some(&(_, element)) = AROMATIC_PAIRS.iter().find(|(sym, _)| *sym == pair) {
                self.pos += 2;
                return Ok((element, true));
            }
            if "bcnops".contains(first) {
                self.pos += 1;
                return Ok((symbol_element(&first.to_ascii_uppercase().to_string(), at)?, true));
            }
        } else if first.is_ascii_uppercase() {
            // two-letter symbols take precedence over their one-letter prefix
            let two = second
                .filter(char::is_ascii_lowercase)
                .and_then(|s| Element::from_symbol(&format!("{first}{s}")));
            if let Some(element) = two {
                self.pos += 2;
                return Ok((element, false));
            }
            if let Some(element) = Element::from_symbol(&first.to_string()) {
                self.pos += 1;
                return Ok((element, false));
            }
        }

        Err(SmilesError::InvalidElement {
            pos: at,
            text: first.to_string(),
        })
    }

    /// `+`, `++`, `+3`, and the same for `-`.
    fn charge(&mut self, open: usize) -> Result<i8, SmilesError> {
        let overflow = SmilesError::InvalidCharge { pos: open };
        let (sign, symbol) = match self.peek() {
            Some('+') => (1i8, '+'),
            Some('-') => (-1i8, '-'),
            _ => return Ok(0),
        };
        self.pos += 1;

        let mut magnitude: i8 = 1;
        if self.peek() == Some(symbol) {
            while self.eat(symbol) {
                magnitude = magnitude.checked_add(1).ok_or_else(|| overflow.clone())?;
            }
        } else if let Some(n) = self.number() {
            magnitude = i8::try_from(n).map_err(|_| overflow)?;
        }
        Ok(sign * magnitude)
    }

    /// `:0` is the conventional "unmapped" marker and yields `None`.
    fn atom_class(&mut self) -> Result<Option<u32>, SmilesError> {
        let at = self.pos;
        if !self.eat(':') {
            return Ok(None);
        }
        let invalid = SmilesError::InvalidAtomClass { pos: at };
        match self.number() {
            None => Err(invalid),
            Some(0) => Ok(None),
            Some(n) => u32::try_from(n).map(Some).map_err(|_| invalid),
        }
    }
}

fn symbol_element(symbol: &str, pos: usize) -> Result<Element, SmilesError> {
    Element::from_symbol(symbol).ok_or_else(|| SmilesError::InvalidElement {
        pos,
        text: symbol.to_string(),
    })
}
