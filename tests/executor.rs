use std::{
    error::Error as StdError,
    fmt,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use sqlcraft::{
    Builder, Error, ExecError, Executor, QueryHook, Statement, TracingHook, Value, hash,
};

#[derive(Debug)]
struct Busy;

impl fmt::Display for Busy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("database is busy")
    }
}

impl StdError for Busy {}

#[derive(Default)]
struct FlakyExecutor {
    failures_left: u32,
    seen: Vec<Statement>,
}

impl Executor for FlakyExecutor {
    type Row = Vec<Value>;
    type Error = Busy;

    fn execute(&mut self, statement: &Statement) -> Result<u64, Self::Error> {
        self.seen.push(statement.clone());
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(Busy);
        }
        Ok(statement.args.len() as u64)
    }

    fn query(&mut self, statement: &Statement) -> Result<Vec<Self::Row>, Self::Error> {
        self.seen.push(statement.clone());
        Ok(vec![statement.args.clone(), Vec::new()])
    }
}

#[derive(Default)]
struct Recorder {
    attempts: AtomicU32,
    errors: Mutex<Vec<String>>,
    retry_until: u32,
}

impl QueryHook for Recorder {
    fn before_execute(&self, _statement: &Statement) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
    }

    fn after_execute(
        &self,
        _statement: &Statement,
        _elapsed: Duration,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        if let Some(error) = error {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    fn should_retry(&self, _statement: &Statement, attempt: u32, _error: &(dyn StdError + 'static)) -> bool {
        attempt < self.retry_until
    }
}

#[test]
fn retries_resubmit_the_same_statement() {
    let recorder = Arc::new(Recorder {
        retry_until: 3,
        ..Default::default()
    });
    let builder = Builder::pgsql()
        .with_hook(recorder.clone())
        .with_hook(Arc::new(TracingHook::new().slow_threshold(Duration::from_secs(1))));
    let query = builder.delete("jobs", hash! { "id" => 9 }).unwrap();

    let mut executor = FlakyExecutor {
        failures_left: 2,
        ..Default::default()
    };
    assert_eq!(1, query.execute(&mut executor).unwrap());
    assert_eq!(3, recorder.attempts.load(Ordering::SeqCst));
    assert_eq!(2, recorder.errors.lock().unwrap().len());
    assert_eq!(3, executor.seen.len());
    assert!(executor.seen.iter().all(|s| s.sql == "DELETE FROM \"jobs\" WHERE \"id\"=$1"));
}

#[test]
fn transport_error_is_returned_unchanged() {
    let recorder = Arc::new(Recorder {
        retry_until: 2,
        ..Default::default()
    });
    let query = Builder::sqlite()
        .with_hook(recorder.clone())
        .delete("jobs", hash! { "id" => 9 })
        .unwrap();
    let mut executor = FlakyExecutor {
        failures_left: 5,
        ..Default::default()
    };
    let err = query.execute(&mut executor).unwrap_err();
    assert!(matches!(err, ExecError::Transport(Busy)));
    assert_eq!(2, executor.seen.len());
    assert_eq!(vec!["database is busy"; 2], *recorder.errors.lock().unwrap());
}

#[test]
fn bind_errors_never_reach_the_executor() {
    let query = Builder::mysql().new_query("SELECT * FROM t WHERE id = {:id}");
    let mut executor = FlakyExecutor::default();
    let err = query.all(&mut executor).unwrap_err();
    assert!(matches!(err, ExecError::Bind(Error::MissingParam(ref name)) if name == "id"));
    assert!(executor.seen.is_empty());
}

#[test]
fn one_returns_the_first_row() {
    let mut select = Builder::mssql().select(());
    select.from("t").where_expr(hash! { "a" => 1 });
    let mut executor = FlakyExecutor::default();
    let row = select.build().one(&mut executor).unwrap();
    assert_eq!(Some(vec![Value::Int(1)]), row);
    assert_eq!("SELECT * FROM [t] WHERE [a]=@p1", executor.seen[0].sql);
}
