use tracing::{debug, error};

use super::Cancel;
use crate::error::MenuError;

/// Both cancellation conditions; what handlers normally guard against.
pub const CANCELLATIONS: &[Cancel] = &[Cancel::Interrupt, Cancel::EndOfInput];

/// Run `work`, then `on_exit`.
///
/// `on_exit` runs once when `work` finishes normally or is cancelled by one
/// of `triggers`; the cancellation is swallowed and the caller gets
/// `on_exit`'s value. Any other error skips `on_exit`, is logged with its
/// full chain and propagates.
pub fn guarded<C, R>(
    ctx: &mut C,
    triggers: &[Cancel],
    work: impl FnOnce(&mut C) -> Result<(), MenuError>,
    on_exit: impl FnOnce(&mut C) -> R,
) -> Result<R, MenuError>
where
    C: ?Sized,
{
    match work(ctx) {
        Ok(()) => Ok(on_exit(ctx)),
        Err(MenuError::Cancelled(c)) if triggers.contains(&c) => {
            debug!(condition = %c, "guarded block cancelled");
            Ok(on_exit(ctx))
        }
        Err(e) => {
            error!(error = ?e, "guarded block failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Count {
        exits: usize,
    }

    fn run(result: Result<(), MenuError>, triggers: &[Cancel]) -> (Result<&'static str, MenuError>, usize) {
        let mut ctx = Count::default();
        let res = guarded(
            &mut ctx,
            triggers,
            |_| result,
            |c| {
                c.exits += 1;
                "back"
            },
        );
        (res, ctx.exits)
    }

    #[test]
    fn normal_completion_runs_exit_once() {
        let (res, exits) = run(Ok(()), CANCELLATIONS);
        assert_eq!(res.unwrap(), "back");
        assert_eq!(exits, 1);
    }

    #[test]
    fn trigger_is_suppressed() {
        for c in [Cancel::Interrupt, Cancel::EndOfInput] {
            let (res, exits) = run(Err(c.into()), CANCELLATIONS);
            assert_eq!(res.unwrap(), "back");
            assert_eq!(exits, 1);
        }
    }

    #[test]
    fn other_conditions_propagate_without_exit() {
        let (res, exits) = run(Err(Cancel::EndOfInput.into()), &[Cancel::Interrupt]);
        assert_eq!(res.unwrap_err().cancel(), Some(Cancel::EndOfInput));
        assert_eq!(exits, 0);

        let (res, exits) = run(Err(anyhow::anyhow!("disk full").into()), CANCELLATIONS);
        assert!(matches!(res, Err(MenuError::Handler(_))));
        assert_eq!(exits, 0);
    }

    #[test]
    fn nested_cancellation_runs_each_exit_once() {
        let mut ctx = Count::default();
        let outer = guarded(
            &mut ctx,
            CANCELLATIONS,
            |c| {
                guarded(c, CANCELLATIONS, |_| Err(Cancel::Interrupt.into()), |c| c.exits += 1)?;
                Err(Cancel::Interrupt.into())
            },
            |c| c.exits += 10,
        );
        assert!(outer.is_ok());
        assert_eq!(ctx.exits, 11);
    }
}
