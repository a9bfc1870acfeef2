use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::error::GameError;

const QUESTION_MARKER: &str = "#Q";
const ANSWER_MARKER: char = '^';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: char,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    /// Answer options in file order, one per label.
    pub choices: Vec<Choice>,
    /// The text of the correct choice, not its label.
    pub correct_answer: String,
}

impl Question {
    pub fn choice(&self, label: char) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.label == label)
    }

    /// A question can be played when it has options and one of them matches
    /// the correct answer.
    pub fn is_playable(&self) -> bool {
        !self.correct_answer.is_empty()
            && self
                .choices
                .iter()
                .any(|choice| choice.text == self.correct_answer)
    }
}

/// Question under construction. Stays mutable until the next `#Q` line or the
/// end of input finalizes it.
#[derive(Debug, Default)]
struct QuestionBuilder {
    prompt: String,
    choices: Vec<Choice>,
    correct_answer: String,
}

impl QuestionBuilder {
    fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            ..Default::default()
        }
    }

    fn append_prompt(&mut self, text: &str) {
        if !self.prompt.is_empty() {
            self.prompt.push(' ');
        }
        self.prompt.push_str(text);
    }

    fn set_choice(&mut self, label: char, text: &str) {
        match self.choices.iter_mut().find(|choice| choice.label == label) {
            Some(existing) => existing.text = text.to_string(),
            None => self.choices.push(Choice {
                label,
                text: text.to_string(),
            }),
        }
    }

    fn set_correct_answer(&mut self, text: &str) {
        self.correct_answer = text.to_string();
    }

    fn build(self) -> Question {
        Question {
            prompt: self.prompt,
            choices: self.choices,
            correct_answer: self.correct_answer,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Line<'a> {
    QuestionStart(&'a str),
    CorrectAnswer(&'a str),
    Choice(char, &'a str),
    Continuation(&'a str),
}

/// Classifies a trimmed, non-blank line.
fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(QUESTION_MARKER) {
        return Line::QuestionStart(rest.trim());
    }
    if let Some(rest) = line.strip_prefix(ANSWER_MARKER) {
        return Line::CorrectAnswer(rest.trim());
    }

    let mut chars = line.chars();
    if let (Some(label), Some(' ')) = (chars.next(), chars.next()) {
        if label.is_alphabetic() && line.chars().count() > 2 {
            let text = &line[label.len_utf8() + 1..];
            return Line::Choice(label, text.trim());
        }
    }

    Line::Continuation(line)
}

pub fn parse_trivia<R: BufRead>(reader: R) -> io::Result<Vec<Question>> {
    let mut questions = Vec::new();
    let mut current: Option<QuestionBuilder> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match (classify(line), current.as_mut()) {
            (Line::QuestionStart(prompt), _) => {
                if let Some(finished) = current.take() {
                    questions.push(finished.build());
                }
                current = Some(QuestionBuilder::new(prompt));
            }
            (Line::CorrectAnswer(answer), Some(question)) => question.set_correct_answer(answer),
            (Line::Choice(label, text), Some(question)) => question.set_choice(label, text),
            (Line::Continuation(text), Some(question)) => question.append_prompt(text),
            (_, None) => {
                debug!(
                    "Discarding line {} before the first question: {:?}",
                    index + 1,
                    line
                );
            }
        }
    }

    if let Some(finished) = current {
        questions.push(finished.build());
    }

    Ok(questions)
}

pub fn load_trivia(path: &Path) -> Result<Vec<Question>, GameError> {
    info!("Loading trivia from: {}", path.display());

    let to_error = |source| GameError::TriviaFile {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(to_error)?;
    let questions = parse_trivia(BufReader::new(file)).map_err(to_error)?;

    info!("Loaded {} questions", questions.len());
    Ok(questions)
}
