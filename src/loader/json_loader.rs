//! JSON decoding for host-supplied map documents and tileset lists.
//!
//! The host editor hands over RPG-Maker-shaped JSON: a map object with a
//! flat five-plane `data` array, and a tileset list (an array whose index 0
//! is conventionally null) carrying sheet names and per-tile flags. Unknown
//! fields are ignored so newer host data keeps loading.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::document::{MapDocument, TilesetDescriptor};
use crate::error::Error;

#[derive(Deserialize)]
struct RawMapDocument {
    #[serde(rename = "tilesetId")]
    tileset_id: i32,
    width: u32,
    height: u32,
    data: Vec<i32>,
}

#[derive(Deserialize)]
struct RawTileset {
    id: i32,
    #[serde(rename = "tilesetNames", default)]
    tileset_names: Vec<String>,
    #[serde(default)]
    flags: Vec<u32>,
}

/// Decode a map document from a JSON string.
pub fn decode_map_document(json: &str) -> Result<MapDocument, Error> {
    let raw: RawMapDocument = serde_json::from_str(json)?;
    MapDocument::new(raw.tileset_id, raw.width, raw.height, raw.data)
}

/// Decode a map document from a JSON file.
pub fn load_map_document(path: &Path) -> Result<MapDocument, Error> {
    let txt = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_map_document(&txt)
}

/// Decode a tileset list from a JSON string, skipping null holes.
pub fn decode_tileset_list(json: &str) -> Result<Vec<TilesetDescriptor>, Error> {
    let raw: Vec<Option<RawTileset>> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .flatten()
        .map(|t| TilesetDescriptor {
            id: t.id,
            tileset_names: t.tileset_names,
            flags: t.flags,
        })
        .collect())
}

/// Decode a tileset list from a JSON file.
pub fn load_tileset_list(path: &Path) -> Result<Vec<TilesetDescriptor>, Error> {
    let txt = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_tileset_list(&txt)
}

/// Find the descriptor a map references.
pub fn descriptor_for(list: &[TilesetDescriptor], tileset_id: i32) -> Result<&TilesetDescriptor, Error> {
    list.iter()
        .find(|t| t.id == tileset_id)
        .ok_or(Error::UnknownTileset(tileset_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("rpgm_tilemap_loader_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    const MAP_JSON: &str = r#"{
      "tilesetId": 2,
      "width": 2,
      "height": 1,
      "scrollType": 0,
      "data": [1,2, 0,0, 0,0, 0,0, 3,0]
    }"#;

    const TILESETS_JSON: &str = r#"[
      null,
      {
        "id": 1,
        "mode": 1,
        "name": "Overworld",
        "tilesetNames": ["A5","A1","A2","A3","A4","B","C","D","E"],
        "flags": [0, 16, 128]
      },
      null,
      {
        "id": 3,
        "tilesetNames": []
      }
    ]"#;

    #[test]
    fn parses_a_map_document_and_ignores_extra_fields() {
        let map = decode_map_document(MAP_JSON).expect("decode");
        assert_eq!(map.tileset_id, 2);
        assert_eq!((map.width, map.height), (2, 1));
        assert_eq!(map.plane_value(1, 0, 0), 2);
        assert_eq!(map.plane_value(0, 0, 4), 3);
    }

    #[test]
    fn rejects_wrong_data_length() {
        let err = decode_map_document(
            r#"{"tilesetId":1,"width":2,"height":2,"data":[0,0,0]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMapSize { expected: 20, actual: 3 }));
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let err = decode_map_document("{ not json").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn parses_tileset_lists_with_null_holes() {
        let list = decode_tileset_list(TILESETS_JSON).expect("decode");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, 1);
        assert_eq!(list[0].tileset_names.len(), 9);
        assert_eq!(list[0].flags[2], 128);
        assert!(list[1].tileset_names.is_empty());
    }

    #[test]
    fn descriptor_lookup_reports_unknown_ids() {
        let list = decode_tileset_list(TILESETS_JSON).unwrap();
        assert_eq!(descriptor_for(&list, 3).unwrap().id, 3);
        let err = descriptor_for(&list, 99).unwrap_err();
        assert!(matches!(err, Error::UnknownTileset(99)));
    }

    #[test]
    fn file_loading_round_trips_and_reports_io_errors() {
        let dir = temp_dir();
        let map_path = dir.join("Map001.json");
        fs::write(&map_path, MAP_JSON).expect("failed to write map");

        let map = load_map_document(&map_path).expect("load");
        assert_eq!(map.tileset_id, 2);

        let err = load_tileset_list(&dir.join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
