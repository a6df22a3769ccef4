use chrono::NaiveDate;
use emp_core::db::open_db_in_memory;
use emp_core::{
    EmpListQuery, EmpPatch, EmpService, EmpServiceError, Gender, NewEmp, RepoError,
    SqliteEmpRepository,
};

#[test]
fn hire_returns_stored_record_with_generated_id() {
    let conn = open_db_in_memory().unwrap();
    let service = EmpService::new(SqliteEmpRepository::try_new(&conn).unwrap());

    let mut tom = NewEmp::new("Tom2", "Tom II", Gender::Male);
    tom.job = Some(1);
    tom.entry_date = NaiveDate::from_ymd_opt(2000, 1, 1);
    tom.dept_id = Some(1);

    let hired = service.hire(tom.clone()).unwrap();
    assert!(hired.id > 0);
    assert_eq!(hired, tom.into_emp(hired.id));
    assert_eq!(service.find(hired.id).unwrap(), Some(hired));
}

#[test]
fn hire_duplicate_username_is_repo_error() {
    let conn = open_db_in_memory().unwrap();
    let service = EmpService::new(SqliteEmpRepository::try_new(&conn).unwrap());

    service
        .hire(NewEmp::new("dup", "First", Gender::Male))
        .unwrap();
    let err = service
        .hire(NewEmp::new("dup", "Second", Gender::Female))
        .unwrap_err();

    match err {
        EmpServiceError::Repo(inner) => assert!(inner.is_constraint_violation()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn dismiss_and_revise_pass_zero_counts_through() {
    let conn = open_db_in_memory().unwrap();
    let service = EmpService::new(SqliteEmpRepository::try_new(&conn).unwrap());

    let mut patch = EmpPatch::for_id(9999);
    patch.name = Some("Ghost".to_string());

    assert_eq!(service.dismiss(9999).unwrap(), 0);
    assert_eq!(service.revise(&patch).unwrap(), 0);
}

#[test]
fn revise_then_search_reflects_patch() {
    let conn = open_db_in_memory().unwrap();
    let service = EmpService::new(SqliteEmpRepository::try_new(&conn).unwrap());

    let hired = service
        .hire(NewEmp::new("zhao", "Zhao Min", Gender::Female))
        .unwrap();
    let mut patch = EmpPatch::for_id(hired.id);
    patch.name = Some("Zhang Min".to_string());
    assert_eq!(service.revise(&patch).unwrap(), 1);

    let query = EmpListQuery {
        name: Some("Zhang".to_string()),
        ..EmpListQuery::default()
    };
    let found = service.search(&query).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, hired.id);
    assert_eq!(found[0].username, "zhao");
}

#[test]
fn service_errors_expose_repo_source() {
    let err = EmpServiceError::from(RepoError::InvalidData("bad row".to_string()));
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().contains("bad row"));
}
