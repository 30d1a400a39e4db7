// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Compile-time marker for "anything that can be called".
//!
//! [`Callable`] is implemented for every closure, function item and function
//! pointer of up to six arguments. The `Args` parameter is the argument tuple
//! and is always inferred, so APIs can accept "a function" without caring
//! about its arity:
//!
//! ```
//! use flowmap_core::Callable;
//!
//! fn accepts_any_function<F, Args>(_f: &F) where F: Callable<Args> {}
//!
//! fn three(a: u8, b: u8, c: u8) -> u8 { a + b + c }
//!
//! accepts_any_function(&three);
//! accepts_any_function(&|| ());
//! // accepts_any_function(&42); // does not compile
//! ```

/// Implemented for all `FnOnce` types with an argument tuple `Args`.
pub trait Callable<Args> {}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<F, R, $($arg),*> Callable<($($arg,)*)> for F where F: FnOnce($($arg),*) -> R {}
    };
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
impl_callable!(A1, A2, A3, A4, A5);
impl_callable!(A1, A2, A3, A4, A5, A6);
impl_callable!(A1, A2, A3, A4, A5, A6, A7);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);
