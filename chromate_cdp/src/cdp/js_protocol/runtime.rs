use serde::{Deserialize, Serialize};

use chromate_types::{Command, Method, MethodId};

/// Unique script identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptId(String);

impl ScriptId {
    pub fn inner(&self) -> &String {
        &self.0
    }
}

impl AsRef<str> for ScriptId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: Into<String>> From<T> for ScriptId {
    fn from(id: T) -> Self {
        ScriptId(id.into())
    }
}

/// Unique object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteObjectId(String);

impl RemoteObjectId {
    pub fn inner(&self) -> &String {
        &self.0
    }
}

impl AsRef<str> for RemoteObjectId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: Into<String>> From<T> for RemoteObjectId {
    fn from(id: T) -> Self {
        RemoteObjectId(id.into())
    }
}

/// Id of an execution context.
pub type ExecutionContextId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteObjectType {
    Object,
    Function,
    Undefined,
    String,
    Number,
    Boolean,
    Symbol,
    Bigint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteObjectSubtype {
    Array,
    Null,
    Node,
    Regexp,
    Date,
    Map,
    Set,
    Weakmap,
    Weakset,
    Iterator,
    Generator,
    Error,
    Proxy,
    Promise,
    Typedarray,
    Arraybuffer,
    Dataview,
    Webassemblymemory,
    Wasmvalue,
}

/// Mirror object referencing original JavaScript object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[doc = "Object type."]
    #[serde(rename = "type")]
    pub r#type: RemoteObjectType,
    #[doc = "Object subtype hint. Specified for `object` type values only."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<RemoteObjectSubtype>,
    #[doc = "Object class (constructor) name. Specified for `object` type values only."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[doc = "Remote object value in case of primitive values or JSON values (if it was requested)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[doc = "Primitive value which can not be JSON-stringified does not have `value`, but gets this\nproperty."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    #[doc = "String representation of the object."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[doc = "Unique object identifier (for non-primitive values)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

/// Detailed information about exception (or error) that was thrown during script compilation or
/// execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    #[doc = "Exception id."]
    pub exception_id: i64,
    #[doc = "Exception text, which should be used together with exception object when available."]
    pub text: String,
    #[doc = "Line number of the exception location (0-based)."]
    pub line_number: i64,
    #[doc = "Column number of the exception location (0-based)."]
    pub column_number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_id: Option<ScriptId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[doc = "Exception object if available."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<RemoteObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<ExecutionContextId>,
}

#[doc = "Evaluates expression on global object.\n[evaluate](https://chromedevtools.github.io/devtools-protocol/tot/Runtime/#method-evaluate)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    #[doc = "Expression to evaluate."]
    pub expression: String,
    #[doc = "Symbolic group name that can be used to release multiple objects."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_group: Option<String>,
    #[doc = "Determines whether Command Line API should be available during the evaluation."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_command_line_api: Option<bool>,
    #[doc = "In silent mode exceptions thrown during evaluation are not reported and do not pause\nexecution."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[doc = "Specifies in which execution context to perform evaluation."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<ExecutionContextId>,
    #[doc = "Whether the result is expected to be a JSON object that should be sent by value."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    #[doc = "Whether execution should be treated as initiated by user in the UI."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_gesture: Option<bool>,
    #[doc = "Whether execution should `await` for resulting value and return once awaited promise is\nresolved."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
}

impl EvaluateParams {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            object_group: None,
            include_command_line_api: None,
            silent: None,
            context_id: None,
            return_by_value: None,
            user_gesture: None,
            await_promise: None,
        }
    }

    pub const IDENTIFIER: &'static str = "Runtime.evaluate";
}

impl Method for EvaluateParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateReturns {
    #[doc = "Evaluation result."]
    pub result: RemoteObject,
    #[doc = "Exception details."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_details: Option<ExceptionDetails>,
}

impl Command for EvaluateParams {
    type Response = EvaluateReturns;
}
