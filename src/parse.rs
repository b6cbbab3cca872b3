use pest::{iterators::Pair, Parser};

use crate::{
    error::LispError,
    symbol::SymbolTable,
    value::{format_num, Value},
};

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct SexpParser;

/// The result of reading one form: the value and the unconsumed input
pub type ReadResult<'a> = (Value, &'a str);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Open,
    Close,
    Quote,
    Atom(&'a str),
    End,
}

/// A token along with where it starts and the input left after it
struct Lexeme<'a> {
    token: Token<'a>,
    start: &'a str,
    rest: &'a str,
}

fn lex(input: &str) -> Option<Lexeme> {
    let pair: Pair<Rule> = SexpParser::parse(Rule::token, input).ok()?.next()?;
    let span = pair.as_span();
    let token = match pair.as_rule() {
        Rule::open => Token::Open,
        Rule::close => Token::Close,
        Rule::quote => Token::Quote,
        Rule::atom => Token::Atom(pair.as_str()),
        Rule::end => Token::End,
        _ => return None,
    };
    Some(Lexeme {
        token,
        start: &input[span.start()..],
        rest: &input[span.end()..],
    })
}

fn fail(error: LispError) -> ReadResult<'static> {
    (Value::error(error), "")
}

/// Reads forms, interning symbols into one table
pub struct Reader<'s> {
    symbols: &'s SymbolTable,
    max_depth: usize,
}

impl<'s> Reader<'s> {
    /// `max_depth` bounds how deeply lists and quotes may nest
    pub fn new(symbols: &'s SymbolTable, max_depth: usize) -> Self {
        Reader { symbols, max_depth }
    }
    /// Reads one form from the front of the input
    pub fn read<'a>(&self, input: &'a str) -> ReadResult<'a> {
        self.read_form(input, 0)
    }
    fn read_form<'a>(&self, input: &'a str, depth: usize) -> ReadResult<'a> {
        if depth > self.max_depth {
            return fail(LispError::NestingTooDeep(self.max_depth));
        }
        let lexeme = match lex(input) {
            Some(lexeme) => lexeme,
            None => return fail(LispError::InvalidSyntax(input.trim_start().into())),
        };
        match lexeme.token {
            Token::End => fail(LispError::EmptyInput),
            Token::Close => fail(LispError::InvalidSyntax(lexeme.start.into())),
            Token::Open => self.read_list(lexeme.rest, depth + 1),
            Token::Quote => {
                let (quoted, rest) = self.read_form(lexeme.rest, depth + 1);
                if quoted.is_error() {
                    return (quoted, "");
                }
                let quote: Value = self.symbols.intern("quote").into();
                (Value::list(vec![quote, quoted]), rest)
            }
            Token::Atom(text) => (self.read_atom(text), lexeme.rest),
        }
    }
    /// Reads list elements up to and including the closing parenthesis
    fn read_list<'a>(&self, mut input: &'a str, depth: usize) -> ReadResult<'a> {
        let mut items = Vec::new();
        loop {
            let lexeme = match lex(input) {
                Some(lexeme) => lexeme,
                None => return fail(LispError::InvalidSyntax(input.trim_start().into())),
            };
            match lexeme.token {
                Token::End => return fail(LispError::UnfinishedParen),
                Token::Close => return (Value::list(items), lexeme.rest),
                _ => {
                    let (item, rest) = self.read_form(input, depth);
                    if item.is_error() {
                        return (item, "");
                    }
                    items.push(item);
                    input = rest;
                }
            }
        }
    }
    /// A token is a number only if the stored number prints back as the token
    fn read_atom(&self, text: &str) -> Value {
        match text.parse::<i64>() {
            Ok(n) if format_num(n as f64) == text => Value::Num(n as f64),
            _ if text == "nil" => Value::Nil,
            _ => self.symbols.intern(text).into(),
        }
    }
    /// Reads every form in the input, stopping after the first read error
    pub fn read_all(&self, mut input: &str) -> Vec<Value> {
        let mut forms = Vec::new();
        while !input.trim().is_empty() {
            let (form, rest) = self.read(input);
            let failed = form.is_error();
            forms.push(form);
            if failed {
                break;
            }
            input = rest;
        }
        forms
    }
}
