//! Invocation seam between typed façades and test doubles.
//!
//! Any mocking library's double can back a typed façade once it implements
//! [`Invoke`]: arguments arrive as JSON values and the returned JSON value is
//! converted into the method's return type.

use crate::instance::StubbedInstance;
use crate::value::Member;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::rc::Rc;

/// A callable test double
pub trait Invoke {
    /// Record a call with `args` and produce its configured return value
    fn invoke(&self, args: Vec<JsonValue>) -> JsonValue;

    /// Record a call from an `async` method and produce the value it
    /// resolves to. Defaults to [`invoke`](Self::invoke).
    fn invoke_async(&self, args: Vec<JsonValue>) -> JsonValue {
        self.invoke(args)
    }
}

impl<T: Invoke + ?Sized> Invoke for Rc<T> {
    fn invoke(&self, args: Vec<JsonValue>) -> JsonValue {
        (**self).invoke(args)
    }

    fn invoke_async(&self, args: Vec<JsonValue>) -> JsonValue {
        (**self).invoke_async(args)
    }
}

/// Serialize one call argument; unserializable values become `null`
#[doc(hidden)]
pub fn to_arg<T: Serialize + ?Sized>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

/// Call member `name` on the instance.
///
/// Excluded members and members holding plain values yield `R::default()`,
/// as does a return value that does not convert into `R`.
#[doc(hidden)]
pub fn dispatch<S, R>(instance: &StubbedInstance<S>, name: &str, args: Vec<JsonValue>) -> R
where
    S: Invoke + Clone,
    R: DeserializeOwned + Default,
{
    match instance.stub(name) {
        Some(stub) => convert(name, stub.invoke(args)),
        None => {
            tracing::trace!(member = name, "no stub to invoke; returning default");
            R::default()
        }
    }
}

/// Call member `name` on behalf of an `async` method.
///
/// Runs synchronously inside the method's future; fallbacks match [`dispatch`].
#[doc(hidden)]
pub fn dispatch_async<S, R>(
    instance: &StubbedInstance<S>,
    name: &str,
    args: Vec<JsonValue>,
) -> R
where
    S: Invoke + Clone,
    R: DeserializeOwned + Default,
{
    match instance.stub(name) {
        Some(stub) => convert(name, stub.invoke_async(args)),
        None => R::default(),
    }
}

/// Read member `name` as a property of type `R`.
///
/// A plain value is returned as-is (or converted when it holds JSON); a stub
/// is invoked without arguments.
#[doc(hidden)]
pub fn read<S, R>(instance: &StubbedInstance<S>, name: &str) -> R
where
    S: Invoke + Clone,
    R: Any + Clone + DeserializeOwned + Default,
{
    match instance.get(name) {
        Some(Member::Value(value)) => value
            .get::<R>()
            .or_else(|| {
                value
                    .downcast_ref::<JsonValue>()
                    .and_then(|json| serde_json::from_value(json.clone()).ok())
            })
            .unwrap_or_default(),
        Some(Member::Stub(stub)) => convert(name, stub.invoke(Vec::new())),
        None => R::default(),
    }
}

/// Write member `name` as a plain value
#[doc(hidden)]
pub fn write<S, T>(instance: &StubbedInstance<S>, name: &str, value: T)
where
    S: Clone,
    T: Any,
{
    instance.set_value(name, value);
}

fn convert<R: DeserializeOwned + Default>(name: &str, returned: JsonValue) -> R {
    serde_json::from_value(returned).unwrap_or_else(|err| {
        tracing::trace!(
            member = name,
            error = %err,
            "stub result not convertible; returning default"
        );
        R::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creator::make_factory;
    use crate::instance::Overrides;
    use serde_json::json;
    use std::cell::RefCell;

    /// Double returning a fixed value and logging arguments
    #[derive(Default)]
    struct Fixed {
        returns: JsonValue,
        seen: RefCell<Vec<Vec<JsonValue>>>,
    }

    impl Invoke for Fixed {
        fn invoke(&self, args: Vec<JsonValue>) -> JsonValue {
            self.seen.borrow_mut().push(args);
            self.returns.clone()
        }
    }

    fn fixed(returns: JsonValue) -> Rc<Fixed> {
        Rc::new(Fixed {
            returns,
            seen: RefCell::default(),
        })
    }

    #[test]
    fn test_to_arg() {
        assert_eq!(to_arg(&5), json!(5));
        assert_eq!(to_arg("text"), json!("text"));
        assert_eq!(to_arg(&(1, "a")), json!([1, "a"]));
    }

    #[test]
    fn test_dispatch_invokes_stub() {
        let creator = make_factory(|_: &str| fixed(json!(7)));
        let instance = creator.create_stubbed_instance();

        let result: i32 = dispatch(&instance, "func", vec![json!(5), json!("whatever")]);
        assert_eq!(result, 7);

        let stub = instance.stub("func").unwrap();
        assert_eq!(*stub.seen.borrow(), vec![vec![json!(5), json!("whatever")]]);
    }

    #[test]
    fn test_dispatch_defaults() {
        let creator = make_factory(|_: &str| fixed(JsonValue::Null));
        let instance = creator.create_stubbed_instance_with(Overrides::new().value("property", 3));

        let unconfigured: i32 = dispatch(&instance, "func", Vec::new());
        assert_eq!(unconfigured, 0);

        let excluded: String = dispatch(&instance, "then", Vec::new());
        assert_eq!(excluded, "");

        let on_value: i32 = dispatch(&instance, "property", Vec::new());
        assert_eq!(on_value, 0);

        dispatch::<_, ()>(&instance, "setter", vec![json!(5)]);
    }

    #[test]
    fn test_read_value_and_stub() {
        let creator = make_factory(|_: &str| fixed(json!(11)));
        let instance = creator.create_stubbed_instance_with(
            Overrides::new()
                .value("getter", 5_i32)
                .value("json", json!(6)),
        );

        assert_eq!(read::<_, i32>(&instance, "getter"), 5);
        assert_eq!(read::<_, i32>(&instance, "json"), 6);
        assert_eq!(read::<_, i32>(&instance, "computed"), 11);
        assert_eq!(read::<_, i32>(&instance, "then"), 0);
    }

    #[test]
    fn test_write() {
        let creator = make_factory(|_: &str| fixed(JsonValue::Null));
        let instance = creator.create_stubbed_instance();
        write(&instance, "property", 8_i32);
        assert_eq!(instance.value::<i32>("property"), Some(8));
    }

    #[test]
    fn test_dispatch_async_uses_invoke_async() {
        struct Settling;

        impl Invoke for Settling {
            fn invoke(&self, _args: Vec<JsonValue>) -> JsonValue {
                json!("sync")
            }

            fn invoke_async(&self, _args: Vec<JsonValue>) -> JsonValue {
                json!("settled")
            }
        }

        let creator = make_factory(|_: &str| Rc::new(Settling));
        let instance = creator.create_stubbed_instance();
        let result: String = dispatch_async(&instance, "asynFunc", Vec::new());
        assert_eq!(result, "settled");
        let excluded: String = dispatch_async(&instance, "then", Vec::new());
        assert_eq!(excluded, "");
    }

    #[test]
    fn test_rc_forwarding() {
        let inner = fixed(json!("ok"));
        let outer: Rc<Rc<Fixed>> = Rc::new(Rc::clone(&inner));
        assert_eq!(outer.invoke(vec![json!(1)]), json!("ok"));
        assert_eq!(inner.seen.borrow().len(), 1);
    }
}
