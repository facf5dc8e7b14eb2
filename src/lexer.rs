use itertools::Itertools;
use std::iter::{Fuse, Peekable};
use std::str::Chars;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Op {
    Fact,
    Pow,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    LeftParen,
    RightParen,
    Unknown(char),
    Number(String),
    Ident(String),
    Operator(Op),
    End,
}

impl Op {
    pub fn from_symbol(c: char) -> Option<Op> {
        let op = match c {
            '!' => Op::Fact,
            '^' => Op::Pow,
            '+' => Op::Add,
            '-' => Op::Sub,
            '*' => Op::Mul,
            '/' => Op::Div,
            '%' => Op::Mod,
            '=' => Op::Eq,
            _ => return None,
        };

        Some(op)
    }

    pub fn symbol(self) -> char {
        match self {
            Op::Fact => '!',
            Op::Pow => '^',
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Mod => '%',
            Op::Eq => '=',
        }
    }
}

impl Token {
    pub fn name(&self) -> String {
        match self {
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Number(x) => x,
            Token::Ident(x) => x,
            Token::Unknown(c) => return c.to_string(),
            Token::Operator(x) => return x.symbol().to_string(),
            Token::End => "<end>",
        }
        .into()
    }
}

/// Half-open range of character indices covered by a token.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Span(pub usize, pub usize);

impl Span {
    /// 1-based column of the first character.
    pub fn column(self) -> usize {
        self.0 + 1
    }
}

struct CharStream<'a> {
    index: usize,
    iterator: Peekable<Fuse<Chars<'a>>>,
}

impl<'a> CharStream<'a> {
    fn new(line: &'a str) -> CharStream<'a> {
        Self {
            index: 0,
            iterator: line.chars().fuse().peekable(),
        }
    }

    fn next(&mut self) -> Option<char> {
        let c = self.iterator.next();

        if c.is_some() {
            self.index += 1;
        }

        c
    }

    fn peek(&mut self) -> Option<char> {
        self.iterator.peek().cloned()
    }

    fn take_while<F>(&mut self, accept: F) -> String
    where
        F: FnMut(&char) -> bool,
    {
        let buffer: String = self.iterator.peeking_take_while(accept).collect();
        self.index += buffer.chars().count();
        buffer
    }
}

pub struct Lexer {
    index: usize,
    tokens: Vec<Token>,
    spans: Vec<Span>,
}

impl Lexer {
    fn is_digit(c: &char) -> bool {
        c.is_ascii_digit() || *c == '.'
    }

    fn is_letter(c: &char) -> bool {
        c.is_ascii_alphabetic()
    }

    fn parse_token(stream: &mut CharStream, c: char) -> Token {
        // A run like "2.3.4" stays one token; the parser rejects it.
        if Self::is_digit(&c) {
            return Token::Number(stream.take_while(Self::is_digit));
        }

        if Self::is_letter(&c) {
            return Token::Ident(stream.take_while(Self::is_letter));
        }

        stream.next();

        match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            c => match Op::from_symbol(c) {
                Some(op) => Token::Operator(op),
                None => Token::Unknown(c),
            },
        }
    }

    fn new(line: &str) -> Lexer {
        let mut stream = CharStream::new(line);
        let mut tokens = vec![];
        let mut spans = vec![];

        while let Some(c) = stream.peek() {
            if c.is_ascii_whitespace() {
                stream.next();
                continue;
            }

            let begin = stream.index;
            let token = Self::parse_token(&mut stream, c);
            let end = stream.index;
            tokens.push(token);
            spans.push(Span(begin, end));
        }

        let index = stream.index;
        spans.push(Span(index, index + 1));

        Lexer {
            index: 0,
            tokens,
            spans,
        }
    }

    pub fn peek(&self) -> Token {
        self.tokens.get(self.index).cloned().unwrap_or(Token::End)
    }

    pub fn next(&mut self) -> Token {
        let tok = self.peek();
        self.index += 1;
        tok
    }

    /// Span of the token that the next call to `next` returns.
    pub fn span(&self) -> Span {
        if self.index < self.tokens.len() {
            self.spans[self.index]
        } else {
            self.spans[self.spans.len() - 1]
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

}

pub fn tokenize(line: &str) -> Lexer {
    Lexer::new(line)
}

#[cfg(test)]
mod test {
    use super::{tokenize, CharStream, Op, Span, Token};

    #[test]
    fn test_charstream() {
        let line = "ab1";
        let mut stream = CharStream::new(line);

        assert_eq!(stream.peek(), Some('a'));
        assert_eq!(stream.take_while(|c| c.is_ascii_alphabetic()), "ab");
        assert_eq!(stream.index, 2);
        assert_eq!(stream.peek(), Some('1'));
        assert_eq!(stream.next(), Some('1'));
        assert_eq!(stream.peek(), None);
        assert_eq!(stream.next(), None);
        assert_eq!(stream.index, 3);
    }

    fn test_match(string: &str, tokens: impl IntoIterator<Item = Token>) {
        let mut lexer = tokenize(string);

        for tok in tokens {
            assert_eq!(lexer.next(), tok);
        }

        assert_eq!(lexer.next(), Token::End);
    }

    #[test]
    fn test_operators() {
        let string = "! ^ + - * / % =";
        let tokens = vec![
            Op::Fact,
            Op::Pow,
            Op::Add,
            Op::Sub,
            Op::Mul,
            Op::Div,
            Op::Mod,
            Op::Eq,
        ]
        .into_iter()
        .map(Token::Operator);

        test_match(string, tokens);
    }

    #[test]
    fn test_tokens() {
        let string = "( ) & ~";
        let tokens = vec![
            Token::LeftParen,
            Token::RightParen,
            Token::Unknown('&'),
            Token::Unknown('~'),
        ];

        test_match(string, tokens);
    }

    #[test]
    fn test_nul() {
        let string = "2\0+9";
        let tokens = vec![
            Token::Number("2".into()),
            Token::Unknown('\0'),
            Token::Operator(Op::Add),
            Token::Number("9".into()),
        ];

        test_match(string, tokens);
    }

    #[test]
    fn test_idents() {
        let string = "pi Tau sqrt a_b";
        let tokens = vec![
            Token::Ident("pi".into()),
            Token::Ident("Tau".into()),
            Token::Ident("sqrt".into()),
            Token::Ident("a".into()),
            Token::Unknown('_'),
            Token::Ident("b".into()),
        ];

        test_match(string, tokens);
    }

    #[test]
    fn test_numbers() {
        let string = "1 .2 3. 4.5 2.3.4";
        let tokens = vec![
            Token::Number("1".into()),
            Token::Number(".2".into()),
            Token::Number("3.".into()),
            Token::Number("4.5".into()),
            Token::Number("2.3.4".into()),
        ];

        test_match(string, tokens);
    }

    #[test]
    fn test_adjacent() {
        let string = "2pi(3)!";
        let tokens = vec![
            Token::Number("2".into()),
            Token::Ident("pi".into()),
            Token::LeftParen,
            Token::Number("3".into()),
            Token::RightParen,
            Token::Operator(Op::Fact),
        ];

        test_match(string, tokens);
    }

    #[test]
    fn test_whitespace() {
        test_match("", vec![]);
        test_match(" \t\n ", vec![]);
        test_match(" 2\t+ 2 ", vec![
            Token::Number("2".into()),
            Token::Operator(Op::Add),
            Token::Number("2".into()),
        ]);
    }

    #[test]
    fn test_spans() {
        let mut lexer = tokenize(" 12 + sqrt(é)");
        let mut spans = vec![];

        while lexer.peek() != Token::End {
            spans.push(lexer.span());
            lexer.next();
        }

        assert_eq!(
            spans,
            vec![Span(1, 3), Span(4, 5), Span(6, 10), Span(10, 11), Span(11, 12), Span(12, 13)]
        );
        assert_eq!(lexer.span(), Span(13, 14));
        assert_eq!(spans[4].column(), 12);
    }

    #[test]
    fn test_peek_next() {
        let string = "a b c";
        let mut lexer = tokenize(string);

        let a = Token::Ident("a".into());
        let b = Token::Ident("b".into());
        let c = Token::Ident("c".into());
        let end = Token::End;

        assert_eq!(lexer.len(), 3);
        assert_eq!(lexer.peek(), a);
        assert_eq!(lexer.peek(), a);
        assert_eq!(lexer.next(), a);
        assert_eq!(lexer.peek(), b);
        assert_eq!(lexer.next(), b);
        assert_eq!(lexer.next(), c);
        assert_eq!(lexer.peek(), end);
        assert_eq!(lexer.next(), end);
        assert_eq!(lexer.next(), end);
    }
}
