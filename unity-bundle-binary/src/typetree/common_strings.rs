//! Built-in TypeTree string table
//!
//! Blob-form TypeTree nodes whose name offset has the top bit set refer into
//! this table instead of the per-tree string pool. The table is the same for
//! every Unity version that writes blob trees: NUL-separated names addressed
//! by byte offset.

use crate::error::{BinaryError, Result};

/// Top bit of a string offset selects the common table
pub const COMMON_STRING_FLAG: u32 = 0x8000_0000;

/// NUL-joined common strings, addressed by byte offset
pub const COMMON_STRINGS: &[u8] = BLOB.as_bytes();

const BLOB: &str = "\
    AABB\0AnimationClip\0AnimationCurve\0AnimationState\0Array\0Base\0BitField\0\
    bitset\0bool\0char\0ColorRGBA\0Component\0data\0deque\0double\0dynamic_array\0\
    FastPropertyName\0first\0float\0Font\0GameObject\0Generic Mono\0GradientNEW\0\
    GUID\0GUIStyle\0int\0list\0long long\0map\0Matrix4x4f\0MdFour\0MonoBehaviour\0\
    MonoScript\0m_ByteSize\0m_Curve\0m_EditorClassIdentifier\0m_EditorHideFlags\0\
    m_Enabled\0m_ExtensionPtr\0m_GameObject\0m_Index\0m_IsArray\0m_IsStatic\0\
    m_MetaFlag\0m_Name\0m_ObjectHideFlags\0m_PrefabInternal\0m_PrefabParentObject\0\
    m_Script\0m_StaticEditorFlags\0m_Type\0m_Version\0Object\0pair\0\
    PPtr<Component>\0PPtr<GameObject>\0PPtr<Material>\0PPtr<MonoBehaviour>\0\
    PPtr<MonoScript>\0PPtr<Object>\0PPtr<Prefab>\0PPtr<Sprite>\0PPtr<TextAsset>\0\
    PPtr<Texture>\0PPtr<Texture2D>\0PPtr<Transform>\0Prefab\0Quaternionf\0Rectf\0\
    RectInt\0RectOffset\0second\0set\0short\0size\0SInt16\0SInt32\0SInt64\0SInt8\0\
    staticvector\0string\0TextAsset\0TextMesh\0Texture\0Texture2D\0Transform\0\
    TypelessData\0UInt16\0UInt32\0UInt64\0UInt8\0unsigned int\0unsigned long long\0\
    unsigned short\0vector\0Vector2f\0Vector3f\0Vector4f\0\
    m_ScriptingClassIdentifier\0Gradient\0Type*\0int2_storage\0int3_storage\0\
    BoundsInt\0m_CorrespondingSourceObject\0m_PrefabInstance\0m_PrefabAsset\0\
    FileSize\0Hash128\0";

/// Check whether a raw (unmasked) offset refers to the common table
pub fn is_common_offset(raw: i32) -> bool {
    raw < 0
}

/// Clear the common-table flag from a raw offset
pub fn mask_offset(raw: i32) -> u32 {
    (raw as u32) & !COMMON_STRING_FLAG
}

/// Look up the common string starting at `offset`
pub fn common_string(offset: u32) -> Option<&'static str> {
    let start = offset as usize;
    if start >= BLOB.len() || (start > 0 && COMMON_STRINGS[start - 1] != 0) {
        return None;
    }
    let rest = &BLOB[start..];
    rest.find('\0').map(|end| &rest[..end])
}

/// Resolve a raw node offset against the common table or the tree's own pool
///
/// Pool strings run to the next NUL inside the pool, however long they are.
pub fn resolve(raw: i32, pool: &[u8]) -> Result<String> {
    let offset = mask_offset(raw);
    if is_common_offset(raw) {
        return common_string(offset).map(str::to_owned).ok_or_else(|| {
            BinaryError::malformed_type_tree(format!("unknown common string offset {}", offset))
        });
    }

    let start = offset as usize;
    if start >= pool.len() {
        return Err(BinaryError::malformed_type_tree(format!(
            "string offset {} outside {}-byte pool",
            offset,
            pool.len()
        )));
    }
    let rest = &pool[start..];
    let end = rest.iter().position(|&b| b == 0).ok_or_else(|| {
        BinaryError::malformed_type_tree(format!("string at offset {} is not terminated", offset))
    })?;
    std::str::from_utf8(&rest[..end])
        .map(str::to_owned)
        .map_err(|e| {
            BinaryError::malformed_type_tree(format!("string at offset {}: {}", offset, e))
        })
}
