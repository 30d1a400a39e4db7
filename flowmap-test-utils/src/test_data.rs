// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Structured chunks for exercising object-mode streams.

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

impl Person {
    #[must_use]
    pub fn named(name: &str, age: u32) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.age)
    }
}

pub fn person_alice() -> Person {
    Person::named("Alice", 25)
}

pub fn person_bob() -> Person {
    Person::named("Bob", 30)
}

pub fn person_charlie() -> Person {
    Person::named("Charlie", 35)
}

pub fn person_dave() -> Person {
    Person::named("Dave", 28)
}

/// Alice, Bob, Charlie and Dave, in that order.
pub fn people() -> Vec<Person> {
    vec![person_alice(), person_bob(), person_charlie(), person_dave()]
}
