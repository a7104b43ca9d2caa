//! Registration forms built from a write operation's declared parameters.

use anyhow::anyhow;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::guard::{guarded, CANCELLATIONS};
use super::session::{Console, Handler, MenuArgs, Transition};
use crate::error::{FormError, MenuError};
use crate::types::Value;
use crate::ui::help::help_register;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// The store handle; supplied by the form, never prompted for.
    Connection,
    /// Signed integer. An empty answer takes `default` when there is one.
    Int { default: Option<i64> },
    Text,
    /// Takes any number of values; cannot be prompted for one by one.
    Variadic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid integer for {field}: {input:?}")]
pub struct CoerceError {
    pub field: &'static str,
    pub input: String,
}

impl Param {
    pub fn connection(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Connection }
    }
    pub fn int(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Int { default: None } }
    }
    pub fn int_or(name: &'static str, default: i64) -> Self {
        Self { name, kind: ParamKind::Int { default: Some(default) } }
    }
    pub fn text(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Text }
    }
    pub fn variadic(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Variadic }
    }

    /// Turn typed-in text into this parameter's type.
    pub fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        match &self.kind {
            ParamKind::Int { default } => {
                let t = raw.trim();
                match (t.is_empty(), default) {
                    (true, Some(d)) => Ok(Value::Int(*d)),
                    _ => t
                        .parse::<i64>()
                        .map(Value::Int)
                        .map_err(|_| CoerceError { field: self.name, input: raw.to_string() }),
                }
            }
            _ => Ok(Value::Text(raw.to_string())),
        }
    }
}

/// Positional arguments handed to a write operation, already coerced.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a>(pub &'a [Value]);

impl Args<'_> {
    pub fn int(&self, i: usize) -> anyhow::Result<i64> {
        self.0
            .get(i)
            .and_then(Value::as_int)
            .ok_or_else(|| anyhow!("argument {i} must be an integer"))
    }

    pub fn text(&self, i: usize) -> anyhow::Result<&str> {
        self.0
            .get(i)
            .and_then(Value::as_text)
            .ok_or_else(|| anyhow!("argument {i} must be text"))
    }
}

pub type WriteFn<S> = Rc<dyn Fn(&mut S, Args<'_>) -> anyhow::Result<i64>>;

/// A store write that returns the new record's id, with its parameter list.
pub struct WriteOp<S> {
    pub name: &'static str,
    pub params: Vec<Param>,
    pub call: WriteFn<S>,
}

impl<S> WriteOp<S> {
    pub fn new<F>(name: &'static str, params: Vec<Param>, call: F) -> Self
    where
        F: Fn(&mut S, Args<'_>) -> anyhow::Result<i64> + 'static,
    {
        Self { name, params, call: Rc::new(call) }
    }
}

/// Write failures the user can recover from by trying again.
pub type Rejection = fn(&anyhow::Error) -> bool;

/// Prompts for every field of a write operation, then performs it.
pub struct RegistrationForm<S> {
    display: String,
    fields: Vec<Param>,
    call: WriteFn<S>,
    store: Rc<RefCell<S>>,
    rejection: Option<Rejection>,
}

impl<S: 'static> RegistrationForm<S> {
    /// Fails on parameter lists that cannot be prompted for.
    pub fn new(display: impl Into<String>, op: WriteOp<S>, store: Rc<RefCell<S>>) -> Result<Self, FormError> {
        let mut fields = Vec::with_capacity(op.params.len());
        for (position, param) in op.params.into_iter().enumerate() {
            match param.kind {
                ParamKind::Variadic => {
                    return Err(FormError::Variadic { target: op.name.to_string(), param: param.name.to_string() })
                }
                ParamKind::Connection if position == 0 => {}
                ParamKind::Connection => {
                    return Err(FormError::MisplacedConnection {
                        target: op.name.to_string(),
                        param: param.name.to_string(),
                        position,
                    })
                }
                _ => fields.push(param),
            }
        }
        Ok(Self { display: display.into(), fields, call: op.call, store, rejection: None })
    }

    /// Write errors matching `check` are shown to the user instead of
    /// ending the run.
    pub fn report_rejections(mut self, check: Rejection) -> Self {
        self.rejection = Some(check);
        self
    }

    /// Ask for each field in order. A field that fails to coerce is asked
    /// again; cancellation drops everything collected so far.
    pub fn collect(&self, console: &mut Console) -> Result<Vec<Value>, MenuError> {
        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let question = format!("{} {}? ", self.display, field.name.replace('_', " "));
            let value = loop {
                let raw = console.prompt(&question)?;
                match field.coerce(&raw) {
                    Ok(v) => break v,
                    Err(e) => {
                        debug!(field = field.name, error = %e, "re-prompting");
                        writeln!(console.out(), "{e}")?;
                    }
                }
            };
            values.push(value);
        }
        Ok(values)
    }

    /// Clear the screen, collect, write, report the new id and pause.
    /// `None` when the write was rejected and the rejection was shown.
    pub fn fill(&self, console: &mut Console) -> Result<Option<i64>, MenuError> {
        console.clear()?;
        writeln!(console.out(), "{}", help_register(&self.display))?;
        let values = self.collect(console)?;
        let result = (self.call)(&mut *self.store.borrow_mut(), Args(&values));
        let id = match result {
            Ok(id) => id,
            Err(e) if self.rejection.is_some_and(|check| check(&e)) => {
                warn!(target_name = %self.display, error = %e, "registration rejected");
                writeln!(console.out(), "{} not registered: {e}", self.display)?;
                console.pause()?;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        info!(target_name = %self.display, id, "registered");
        writeln!(console.out(), "Registered {}, id: {}", self.display.to_lowercase(), id)?;
        console.pause()?;
        Ok(Some(id))
    }

    /// Menu handler: fill the form, then show the menu it was picked from
    /// again, also when the user cancels halfway.
    pub fn into_handler<T: 'static>(self) -> Handler<T> {
        Rc::new(move |console: &mut Console, index: usize, _label: &str, origin: &MenuArgs<T>| {
            guarded(
                console,
                CANCELLATIONS,
                |c| self.fill(c).map(drop),
                |_| Transition::Replace(origin.clone().initial(index)),
            )
        })
    }
}
