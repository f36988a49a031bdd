use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::layout::Layout;
use crate::tensor::View;

struct ViewData<'a> {
    view: &'a View,
}

impl Serialize for ViewData<'_> {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_seq(self.view.iter())
    }
}

/// Views serialize as a struct with a `shape` field and a `data` field
/// containing the elements in logical (row-major) order. The layout of the
/// view within its buffer is not preserved.
impl Serialize for View {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        let mut view = serializer.serialize_struct("View", 2)?;
        view.serialize_field("shape", self.shape())?;
        view.serialize_field("data", &ViewData { view: self })?;
        view.end()
    }
}

#[cfg(test)]
mod tests {
    use crate::{arange, arange_shape, Slice};

    #[test]
    fn test_serialize() {
        let view = arange(16)
            .unwrap()
            .index(Slice::new(Some(1), Some(14), Some(2)))
            .unwrap();
        let json = serde_json::to_value(&view).unwrap();
        let expected: serde_json::Value = serde_json::from_str(
            r#"{"shape": [7], "data": [1.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0]}"#,
        )
        .unwrap();
        assert_eq!(json, expected);
    }

    #[test]
    fn test_serialize_reversed() {
        // Reversing the rows changes the serialized data order.
        let view = arange_shape(&[2, 2])
            .unwrap()
            .index((Slice::new(Some(1), Some(-1), Some(-1)), ..))
            .unwrap();
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"{"shape":[2,2],"data":[2.0,3.0,0.0,1.0]}"#);
    }
}
