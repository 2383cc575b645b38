mod common;

use authz_data::contract::{NewTenant, NewUser, Tenant, TenantPatch, UserPatch};
use authz_data::domain::repo::{DuplicateKey, Repository};
use authz_data::infra::storage::SeaOrmRepository;
use authz_data::{DomainError, ResourceKind};
use keyset_core::{Cursor, Error, ListParams, TypedValue};

fn params(pairs: &[(&str, &str)]) -> ListParams {
    let mut p = ListParams::default();
    for (k, v) in pairs {
        let v = Some((*v).to_owned());
        match *k {
            "sortBy" => p.sort_by = v,
            "sortOrder" => p.sort_order = v,
            "q" => p.q = v,
            "after" => p.after = v,
            "afterValue" => p.after_value = v,
            "before" => p.before = v,
            "beforeValue" => p.before_value = v,
            "limit" => p.limit = v,
            other => panic!("unknown param {other}"),
        }
    }
    p
}

async fn seed_tenants(svc: &authz_data::Service<Tenant>) {
    for (id, name) in [
        ("a", None),
        ("b", Some("x")),
        ("c", None),
        ("d", Some("y")),
        ("e", Some("x")),
    ] {
        svc.create(NewTenant {
            tenant_id: Some(id.into()),
            name: name.map(str::to_owned),
        })
        .await
        .unwrap();
    }
}

fn ids(items: &[Tenant]) -> Vec<&str> {
    items.iter().map(|t| t.tenant_id.as_str()).collect()
}

#[tokio::test]
async fn tenant_pages_walk_forward_and_back() {
    let (module, _db) = common::setup().await;
    let svc = &module.services().tenants;
    seed_tenants(svc).await;

    let q = svc
        .parse_query(&params(&[("sortBy", "name"), ("limit", "2")]))
        .unwrap();
    let p1 = svc.list(&q).await.unwrap();
    assert_eq!(ids(&p1.items), vec!["a", "c"]);
    assert!(p1.page_info.has_more);

    let q = svc
        .parse_query(&params(&[("sortBy", "name"), ("limit", "2"), ("after", "c")]))
        .unwrap();
    let p2 = svc.list(&q).await.unwrap();
    assert_eq!(ids(&p2.items), vec!["b", "e"]);

    let q = svc
        .parse_query(&params(&[
            ("sortBy", "name"),
            ("limit", "2"),
            ("after", "e"),
            ("afterValue", "x"),
        ]))
        .unwrap();
    let p3 = svc.list(&q).await.unwrap();
    assert_eq!(ids(&p3.items), vec!["d"]);
    assert!(!p3.page_info.has_more);

    let q = svc
        .parse_query(&params(&[
            ("sortBy", "name"),
            ("limit", "2"),
            ("before", "d"),
            ("beforeValue", "y"),
        ]))
        .unwrap();
    let back = svc.list(&q).await.unwrap();
    assert_eq!(ids(&back.items), vec!["b", "e"]);
    assert!(back.page_info.has_more);
}

#[tokio::test]
async fn descending_search_and_exact_multiple() {
    let (module, _db) = common::setup().await;
    let svc = &module.services().tenants;
    seed_tenants(svc).await;

    let q = svc
        .parse_query(&params(&[("sortBy", "name"), ("sortOrder", "DESC")]))
        .unwrap();
    assert_eq!(ids(&svc.list(&q).await.unwrap().items), vec!["d", "e", "b", "c", "a"]);

    let q = svc.parse_query(&params(&[("q", "x"), ("limit", "2")])).unwrap();
    let page = svc.list(&q).await.unwrap();
    assert_eq!(ids(&page.items), vec!["b", "e"]);
    assert!(!page.page_info.has_more);
}

#[tokio::test]
async fn invalid_list_parameters_are_rejected() {
    let (module, _db) = common::setup().await;
    let svc = &module.services().tenants;

    for limit in ["0", "-1", "1001", "ten"] {
        assert!(matches!(
            svc.parse_query(&params(&[("limit", limit)])),
            Err(Error::InvalidParameter { param: "limit", .. })
        ));
    }
    assert!(matches!(
        svc.parse_query(&params(&[("sortBy", "createdAt"), ("after", "a"), ("afterValue", "yesterday")])),
        Err(Error::InvalidCursor(_))
    ));
    assert!(matches!(
        svc.parse_query(&params(&[("sortBy", "email")])),
        Err(Error::InvalidParameter { param: "sortBy", .. })
    ));
}

#[tokio::test]
async fn crud_round_trip_for_users() {
    let (module, _db) = common::setup().await;
    let svc = &module.services().users;

    let generated = svc
        .create(NewUser {
            user_id: None,
            email: Some("ann@example.com".into()),
        })
        .await
        .unwrap();
    assert_eq!(generated.user_id.len(), 36);

    let fetched = svc.get(&generated.user_id).await.unwrap();
    assert_eq!(fetched, generated);

    let updated = svc
        .update(
            &generated.user_id,
            UserPatch {
                email: Some("ann@corp.example".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email.as_deref(), Some("ann@corp.example"));
    assert_eq!(updated.created_at, generated.created_at);

    svc.delete(&generated.user_id).await.unwrap();
    assert!(matches!(
        svc.get(&generated.user_id).await,
        Err(DomainError::NotFound {
            kind: ResourceKind::User,
            ..
        })
    ));
    assert!(matches!(
        svc.delete(&generated.user_id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn duplicates_and_validation() {
    let (module, db) = common::setup().await;
    let svc = &module.services().tenants;
    let new = || NewTenant {
        tenant_id: Some("acme".into()),
        name: Some("Acme".into()),
    };

    let acme = svc.create(new()).await.unwrap();
    assert!(matches!(
        svc.create(new()).await,
        Err(DomainError::AlreadyExists {
            kind: ResourceKind::Tenant,
            ..
        })
    ));

    let repo = SeaOrmRepository::<Tenant, _>::new(db.clone());
    let err = repo.insert(acme).await.unwrap_err();
    assert!(err.is::<DuplicateKey>());

    assert!(matches!(
        svc.create(NewTenant {
            tenant_id: Some("  ".into()),
            name: None,
        })
        .await,
        Err(DomainError::Validation { field: "id", .. })
    ));
    assert!(matches!(
        svc.update("acme", TenantPatch { name: Some("".into()) }).await,
        Err(DomainError::Validation { field: "name", .. })
    ));
    assert!(matches!(
        svc.update("missing", TenantPatch::default()).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn timestamp_cursor_from_a_row_continues_the_walk() {
    let (module, _db) = common::setup().await;
    let svc = &module.services().tenants;
    seed_tenants(svc).await;

    let q = svc
        .parse_query(&params(&[("sortBy", "createdAt"), ("limit", "3")]))
        .unwrap();
    let first = svc.list(&q).await.unwrap();
    assert_eq!(first.items.len(), 3);

    let last = first.last().unwrap();
    let next = q.clone().after(Cursor {
        anchor_id: last.tenant_id.as_str().into(),
        anchor_value: TypedValue::from(last.created_at),
    });
    let rest = svc.list(&next).await.unwrap();
    assert_eq!(rest.items.len(), 2);
    assert!(!rest.page_info.has_more);

    let mut all: Vec<_> = ids(&first.items);
    all.extend(ids(&rest.items));
    all.sort_unstable();
    assert_eq!(all, vec!["a", "b", "c", "d", "e"]);
}
