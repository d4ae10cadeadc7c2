//! End-to-end encode/decode through the serde front door

use std::collections::{BTreeMap, HashMap};

use massive_encoding::{
    from_slice, to_bytes, to_vec, BinaryDecoder, BinaryEncoder, EncodedData, StorageContainer,
};
use serde::{Deserialize, Serialize};

fn round_trip<T>(value: &T) -> T
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let bytes = to_vec(value).unwrap();
    from_slice(&bytes).unwrap()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sensor {
    id: u32,
    name: String,
    active: bool,
    offset: Option<i16>,
    readings: Vec<f64>,
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Command {
    Stop,
    Move(i32, i32),
    Rename(String),
    Configure { rate: u16, sensor: Sensor },
}

fn sensor() -> Sensor {
    let mut tags = BTreeMap::new();
    tags.insert("unit".to_string(), "kPa".to_string());
    tags.insert("zone".to_string(), "north".to_string());
    Sensor {
        id: 42,
        name: "barometer".to_string(),
        active: true,
        offset: None,
        readings: vec![101.3, -0.5, 0.0],
        tags,
    }
}

#[test]
fn scalar_extremes() {
    assert_eq!(round_trip(&i8::MIN), i8::MIN);
    assert_eq!(round_trip(&i8::MAX), i8::MAX);
    assert_eq!(round_trip(&i16::MIN), i16::MIN);
    assert_eq!(round_trip(&i32::MIN), i32::MIN);
    assert_eq!(round_trip(&i64::MIN), i64::MIN);
    assert_eq!(round_trip(&i64::MAX), i64::MAX);
    assert_eq!(round_trip(&u8::MAX), u8::MAX);
    assert_eq!(round_trip(&u16::MAX), u16::MAX);
    assert_eq!(round_trip(&u32::MAX), u32::MAX);
    assert_eq!(round_trip(&u64::MAX), u64::MAX);
    assert!(round_trip(&true));
    assert!(!round_trip(&false));
}

#[test]
fn float_special_values() {
    assert_eq!(round_trip(&f32::INFINITY), f32::INFINITY);
    assert_eq!(round_trip(&f64::NEG_INFINITY), f64::NEG_INFINITY);
    assert_eq!(round_trip(&f64::MIN_POSITIVE), f64::MIN_POSITIVE);
    assert!(round_trip(&f32::NAN).is_nan());
    assert!(round_trip(&f64::NAN).is_nan());
    assert_eq!(round_trip(&-0.0f64).to_bits(), (-0.0f64).to_bits());
}

#[test]
fn strings() {
    assert_eq!(round_trip(&String::new()), "");
    assert_eq!(round_trip(&"héllo wörld ✓ 🚀".to_string()), "héllo wörld ✓ 🚀");
    assert_eq!(round_trip(&'λ'), 'λ');
}

#[test]
fn sequences() {
    assert_eq!(round_trip(&Vec::<u8>::new()), Vec::<u8>::new());
    assert_eq!(round_trip(&vec![7i32]), vec![7]);
    let many: Vec<i64> = (0..100).map(|i| i * i - 50).collect();
    assert_eq!(round_trip(&many), many);
    assert_eq!(round_trip(&(1u8, "two".to_string(), 3.0f32)), (1u8, "two".to_string(), 3.0f32));
}

#[test]
fn maps() {
    assert_eq!(round_trip(&BTreeMap::<String, u8>::new()), BTreeMap::new());

    let mut single = HashMap::new();
    single.insert("only".to_string(), vec![Some(1u16), None]);
    assert_eq!(round_trip(&single), single);

    let mut numbered = BTreeMap::new();
    for i in 0..20u32 {
        numbered.insert(i, format!("value {i}"));
    }
    assert_eq!(round_trip(&numbered), numbered);
}

#[test]
fn optionals_encode_as_null() {
    assert_eq!(to_vec(&Option::<u8>::None).unwrap(), vec![0xa, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(round_trip(&Option::<u8>::None), None);
    assert_eq!(round_trip(&Some(9u8)), Some(9));
    assert_eq!(round_trip(&vec![None, Some("x".to_string())]), vec![None, Some("x".to_string())]);
}

#[test]
fn structs_and_enums() {
    assert_eq!(round_trip(&sensor()), sensor());

    let commands = vec![
        Command::Stop,
        Command::Move(-3, 4),
        Command::Rename("west".to_string()),
        Command::Configure {
            rate: 60,
            sensor: sensor(),
        },
    ];
    assert_eq!(round_trip(&commands), commands);
}

#[test]
fn nested_four_levels() {
    let value: Vec<BTreeMap<String, Vec<Vec<u8>>>> = vec![{
        let mut map = BTreeMap::new();
        map.insert("deep".to_string(), vec![vec![1, 2], vec![], vec![3]]);
        map
    }];
    assert_eq!(round_trip(&value), value);
}

#[test]
fn bytes_and_vec_agree() {
    let data = vec![0u8, 1, 254, 255];
    assert_eq!(to_bytes(&data).unwrap().as_ref(), to_vec(&data).unwrap().as_slice());
}

#[test]
fn encoded_data_survives_byte_round_trip() {
    let data = BinaryEncoder::new().encode(&sensor()).unwrap();
    let bytes = data.to_vec();
    assert_eq!(bytes.len(), data.byte_count());

    let read = EncodedData::from_bytes(&bytes).unwrap();
    assert_eq!(read, data);

    let decoded: Sensor = BinaryDecoder::new().decode(&read).unwrap();
    assert_eq!(decoded, sensor());
}

#[test]
fn keys_are_written_in_sorted_order() {
    #[derive(Serialize)]
    struct Unordered {
        zebra: u8,
        apple: u8,
        mango: u8,
    }
    let data = BinaryEncoder::new()
        .encode(&Unordered {
            zebra: 1,
            apple: 2,
            mango: 3,
        })
        .unwrap();
    let keys: Vec<&str> = match data.storage() {
        StorageContainer::Keyed(keyed) => keyed.keys().collect(),
        other => panic!("expected keyed, got {other}"),
    };
    assert_eq!(keys, vec!["apple", "mango", "zebra"]);
}

#[test]
fn encoding_is_deterministic() {
    let first = to_vec(&sensor()).unwrap();
    let second = to_vec(&sensor()).unwrap();
    assert_eq!(first, second);
}
