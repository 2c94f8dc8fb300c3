//! Compile-time binding between a pattern's captures and its handler.
//!
//! A pattern accumulates its capture types as a tuple: `()` for no
//! captures, `(i64,)` after an `:int` capture, `(i64, String)` after a
//! further `:string`, and so on up to eight captures. [`Handler`] is
//! implemented for closures whose parameter list structurally equals that
//! tuple, so a route whose handler disagrees with its pattern does not
//! compile.
//!
//! At match time the engine works with a stack of type-erased [`Capture`]
//! values; [`Args::from_captures`] reassembles the typed tuple. The
//! downcasts cannot fail for routes built through the typed API.

use std::any::Any;

/// One decoded capture, type-erased for the walk.
pub type Capture = Box<dyn Any + Send + Sync>;

/// A tuple of capture types, reconstructible from the capture stack.
pub trait Args: Sized + 'static {
    /// Number of handler arguments.
    const ARITY: usize;

    /// Reassemble the tuple from captures collected in declaration order
    /// (path captures first, then query captures).
    fn from_captures(captures: Vec<Capture>) -> Self;
}

/// Type-level push: `A: Push<T>` names the tuple `A` extended with `T`.
pub trait Push<T: Send + Sync + 'static>: Args {
    /// The extended tuple.
    type Output: Args;
}

/// A route handler taking the capture tuple `A`.
pub trait Handler<A: Args>: Send + Sync + 'static {
    /// The handler's result type; every route in one router shares it.
    type Out;

    /// Apply the handler to the decoded captures.
    fn invoke(&self, args: A) -> Self::Out;
}

fn take<T: Send + Sync + 'static>(captures: &mut std::vec::IntoIter<Capture>) -> T {
    let capture = captures.next().expect("capture stack arity mismatch");
    *capture
        .downcast::<T>()
        .expect("capture stack type mismatch")
}

macro_rules! impl_capture_tuple {
    ($($ty:ident),*) => {
        impl<$($ty: Send + Sync + 'static),*> Args for ($($ty,)*) {
            const ARITY: usize = 0 $(+ { let _ = stringify!($ty); 1 })*;

            #[allow(unused_mut, unused_variables)]
            fn from_captures(captures: Vec<Capture>) -> Self {
                debug_assert_eq!(captures.len(), Self::ARITY);
                let mut captures = captures.into_iter();
                ($(take::<$ty>(&mut captures),)*)
            }
        }

        impl<F, R, $($ty: Send + Sync + 'static),*> Handler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
        {
            type Out = R;

            #[allow(non_snake_case)]
            fn invoke(&self, args: ($($ty,)*)) -> R {
                let ($($ty,)*) = args;
                (self)($($ty),*)
            }
        }
    };
}

// Push is implemented one arity short of the cap: pushing onto an
// eight-capture pattern has nowhere to go.
macro_rules! impl_push {
    ($($ty:ident),*) => {
        impl<Z: Send + Sync + 'static, $($ty: Send + Sync + 'static),*> Push<Z> for ($($ty,)*) {
            type Output = ($($ty,)* Z,);
        }
    };
}

impl_capture_tuple!();
impl_capture_tuple!(T1);
impl_capture_tuple!(T1, T2);
impl_capture_tuple!(T1, T2, T3);
impl_capture_tuple!(T1, T2, T3, T4);
impl_capture_tuple!(T1, T2, T3, T4, T5);
impl_capture_tuple!(T1, T2, T3, T4, T5, T6);
impl_capture_tuple!(T1, T2, T3, T4, T5, T6, T7);
impl_capture_tuple!(T1, T2, T3, T4, T5, T6, T7, T8);

impl_push!();
impl_push!(T1);
impl_push!(T1, T2);
impl_push!(T1, T2, T3);
impl_push!(T1, T2, T3, T4);
impl_push!(T1, T2, T3, T4, T5);
impl_push!(T1, T2, T3, T4, T5, T6);
impl_push!(T1, T2, T3, T4, T5, T6, T7);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_counts() {
        assert_eq!(<() as Args>::ARITY, 0);
        assert_eq!(<(i64,) as Args>::ARITY, 1);
        assert_eq!(<(i64, String, bool) as Args>::ARITY, 3);
    }

    #[test]
    fn from_captures_reassembles_in_order() {
        let captures: Vec<Capture> = vec![
            Box::new(7i64),
            Box::new("x".to_string()),
            Box::new(true),
        ];
        let (n, s, b) = <(i64, String, bool)>::from_captures(captures);
        assert_eq!(n, 7);
        assert_eq!(s, "x");
        assert!(b);
    }

    #[test]
    fn handler_invocation() {
        let h = |a: i64, b: String| format!("{a}-{b}");
        let out = Handler::invoke(&h, (3i64, "y".to_string()));
        assert_eq!(out, "3-y");
    }

    #[test]
    fn push_grows_the_tuple() {
        fn assert_args<A: Args>(expected: usize) {
            assert_eq!(A::ARITY, expected);
        }
        assert_args::<<() as Push<i64>>::Output>(1);
        assert_args::<<(i64,) as Push<String>>::Output>(2);
    }
}
