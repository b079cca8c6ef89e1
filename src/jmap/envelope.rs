//! Request/response envelopes and the positional `[name, arguments, callId]`
//! invocation triple.

use crate::error::{Error, Result};
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Call ID used for single-call batches.
pub const CALL_ID: &str = "0";

/// One method call or method response. On the wire this is a three element
/// array, never an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation<A = Value> {
    pub name: String,
    pub arguments: A,
    pub id: String,
}

impl<A> Invocation<A> {
    pub fn new(name: impl Into<String>, arguments: A, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
            id: id.into(),
        }
    }
}

impl<A: Serialize> Serialize for Invocation<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(3)?;
        tup.serialize_element(&self.name)?;
        tup.serialize_element(&self.arguments)?;
        tup.serialize_element(&self.id)?;
        tup.end()
    }
}

impl<'de, A: Deserialize<'de>> Deserialize<'de> for Invocation<A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct InvocationVisitor<A>(PhantomData<A>);

        impl<'de, A: Deserialize<'de>> Visitor<'de> for InvocationVisitor<A> {
            type Value = Invocation<A>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [methodName, arguments, callId] triple")
            }

            fn visit_seq<S: SeqAccess<'de>>(
                self,
                mut seq: S,
            ) -> std::result::Result<Self::Value, S::Error> {
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let arguments: A = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let id: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;

                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                Ok(Invocation {
                    name,
                    arguments,
                    id,
                })
            }
        }

        deserializer.deserialize_seq(InvocationVisitor(PhantomData))
    }
}

/// Outgoing batch: `{"using": [...], "methodCalls": [[...], ...]}`.
#[derive(Debug, Serialize)]
pub struct Request<A> {
    pub using: Vec<String>,
    #[serde(rename = "methodCalls")]
    pub method_calls: Vec<Invocation<A>>,
}

impl<A: Serialize> Request<A> {
    pub fn new(using: &[&str], method_calls: Vec<Invocation<A>>) -> Self {
        Self {
            using: using.iter().map(|s| s.to_string()).collect(),
            method_calls,
        }
    }

    /// A batch holding exactly one call with [`CALL_ID`].
    pub fn single(using: &[&str], method: &str, arguments: A) -> Self {
        Self::new(using, vec![Invocation::new(method, arguments, CALL_ID)])
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Incoming batch. Arguments stay untyped until the caller knows which
/// method produced them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub method_responses: Vec<Invocation>,
    #[serde(default)]
    pub session_state: Option<String>,
    #[serde(default)]
    pub latest_client_version: Option<String>,
}

impl Response {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// Responses are correlated with calls by position; a single-call batch
    /// answers in the first slot.
    pub fn into_first(self) -> Result<Invocation> {
        self.method_responses
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("empty methodResponses".into()))
    }
}
