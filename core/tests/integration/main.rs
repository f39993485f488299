mod common;
mod polymorphism;
mod typecheck_fail;
mod typecheck_ok;
