//! Integration tests for `SqliteStore` against an in-memory database.

use thaigeo_core::{
  geo::{Level, NewDistrict, NewProvince, NewSubdistrict},
  store::GeoStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn bangkok() -> NewProvince {
  NewProvince {
    code:    "10".into(),
    name_th: "กรุงเทพมหานคร".into(),
    name_en: "Bangkok".into(),
  }
}

fn phra_nakhon(province_id: Option<i64>) -> NewDistrict {
  NewDistrict {
    code:    "1001".into(),
    name_th: "พระนคร".into(),
    name_en: "Phra Nakhon".into(),
    province_id,
  }
}

fn phra_borom(district_id: Option<i64>) -> NewSubdistrict {
  NewSubdistrict {
    code:        "100101".into(),
    name_th:     "พระบรมมหาราชวัง".into(),
    name_en:     "Phra Borom Maha Ratchawang".into(),
    postal_code: "10200".into(),
    district_id,
  }
}

// ─── Provinces ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_province_by_code() {
  let s = store().await;

  let created = s.create_province(bangkok()).await.unwrap();
  assert!(created.id > 0);

  let found = s.find_province("10").await.unwrap().unwrap();
  assert_eq!(found.id, created.id);
  assert_eq!(found.name_en, "Bangkok");

  let by_id = s.get_province(created.id).await.unwrap().unwrap();
  assert_eq!(by_id.code, "10");
}

#[tokio::test]
async fn find_missing_province_returns_none() {
  let s = store().await;
  assert!(s.find_province("99").await.unwrap().is_none());
  assert!(s.get_province(42).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_province_code_is_rejected() {
  let s = store().await;
  s.create_province(bangkok()).await.unwrap();
  let err = s.create_province(bangkok()).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)), "{err}");
  assert_eq!(s.count(Level::Province).await.unwrap(), 1);
}

#[tokio::test]
async fn empty_code_is_rejected_before_insert() {
  let s = store().await;
  let mut p = bangkok();
  p.code.clear();
  let err = s.create_province(p).await.unwrap_err();
  assert!(matches!(err, Error::Core(_)), "{err}");
}

#[tokio::test]
async fn provinces_list_in_code_order() {
  let s = store().await;
  for (code, name) in [("50", "Chiang Mai"), ("10", "Bangkok"), ("20", "Chon Buri")] {
    s.create_province(NewProvince {
      code:    code.into(),
      name_th: String::new(),
      name_en: name.into(),
    })
    .await
    .unwrap();
  }

  let codes: Vec<_> = s
    .list_provinces()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.code)
    .collect();
  assert_eq!(codes, ["10", "20", "50"]);
}

// ─── Districts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn district_links_to_province() {
  let s = store().await;
  let p = s.create_province(bangkok()).await.unwrap();
  let d = s.create_district(phra_nakhon(Some(p.id))).await.unwrap();

  let found = s.find_district("1001").await.unwrap().unwrap();
  assert_eq!(found.id, d.id);
  assert_eq!(found.province_id, Some(p.id));

  let listed = s.list_districts(Some(p.id)).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert!(s.list_districts(Some(p.id + 1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn orphan_district_can_be_repaired() {
  let s = store().await;
  let p = s.create_province(bangkok()).await.unwrap();
  let d = s.create_district(phra_nakhon(None)).await.unwrap();
  assert_eq!(d.province_id, None);

  s.set_district_province(d.id, p.id).await.unwrap();

  let after = s.get_district(d.id).await.unwrap().unwrap();
  assert_eq!(after.province_id, Some(p.id));
  assert_eq!(after.code, d.code);
  assert_eq!(after.name_en, d.name_en);
}

#[tokio::test]
async fn set_parent_on_missing_row_is_not_found() {
  let s = store().await;
  let p = s.create_province(bangkok()).await.unwrap();
  let err = s.set_district_province(999, p.id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { level: Level::District, id: 999 }));
}

#[tokio::test]
async fn district_with_unknown_province_violates_foreign_key() {
  let s = store().await;
  let err = s.create_district(phra_nakhon(Some(123))).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

// ─── Subdistricts ────────────────────────────────────────────────────────────

#[tokio::test]
async fn subdistrict_keeps_postal_code() {
  let s = store().await;
  let p = s.create_province(bangkok()).await.unwrap();
  let d = s.create_district(phra_nakhon(Some(p.id))).await.unwrap();
  s.create_subdistrict(phra_borom(Some(d.id))).await.unwrap();

  let found = s.find_subdistrict("100101").await.unwrap().unwrap();
  assert_eq!(found.postal_code, "10200");
  assert_eq!(found.district_id, Some(d.id));
  assert_eq!(s.list_subdistricts(Some(d.id)).await.unwrap().len(), 1);
  assert_eq!(s.list_subdistricts(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn orphan_subdistrict_can_be_repaired() {
  let s = store().await;
  let p = s.create_province(bangkok()).await.unwrap();
  let d = s.create_district(phra_nakhon(Some(p.id))).await.unwrap();
  let sd = s.create_subdistrict(phra_borom(None)).await.unwrap();

  s.set_subdistrict_district(sd.id, d.id).await.unwrap();

  let after = s.find_subdistrict("100101").await.unwrap().unwrap();
  assert_eq!(after.district_id, Some(d.id));
  assert_eq!(after.postal_code, "10200");
}

// ─── Maintenance ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn counts_start_at_zero() {
  let s = store().await;
  for level in Level::ALL {
    assert_eq!(s.count(level).await.unwrap(), 0);
  }
}

#[tokio::test]
async fn parent_delete_is_restricted_while_children_exist() {
  let s = store().await;
  let p = s.create_province(bangkok()).await.unwrap();
  s.create_district(phra_nakhon(Some(p.id))).await.unwrap();

  assert!(s.delete_all(Level::Province).await.is_err());
  assert_eq!(s.count(Level::Province).await.unwrap(), 1);

  assert_eq!(s.delete_all(Level::District).await.unwrap(), 1);
  assert_eq!(s.delete_all(Level::Province).await.unwrap(), 1);
  assert_eq!(s.count(Level::Province).await.unwrap(), 0);
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let dir  = std::env::temp_dir().join(format!("thaigeo-store-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("geo.sqlite");
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create_province(bangkok()).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.count(Level::Province).await.unwrap(), 1);

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
