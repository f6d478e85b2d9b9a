//! Synthetic fixture writers shared by the integration tests

#![allow(dead_code)]

use unity_bundle_binary::ByteOrder;

/// Byte buffer writer with a switchable byte order
pub struct Writer {
    pub buf: Vec<u8>,
    pub order: ByteOrder,
}

macro_rules! write_int {
    ($name:ident, $ty:ty) => {
        pub fn $name(&mut self, value: $ty) -> &mut Self {
            match self.order {
                ByteOrder::Big => self.buf.extend_from_slice(&value.to_be_bytes()),
                ByteOrder::Little => self.buf.extend_from_slice(&value.to_le_bytes()),
            }
            self
        }
    };
}

impl Writer {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            buf: Vec::new(),
            order,
        }
    }

    write_int!(u16, u16);
    write_int!(i16, i16);
    write_int!(u32, u32);
    write_int!(i32, i32);
    write_int!(u64, u64);
    write_int!(i64, i64);

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    pub fn cstring(&mut self, value: &str) -> &mut Self {
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(0);
        self
    }

    pub fn align(&mut self) -> &mut Self {
        while self.buf.len() % 4 != 0 {
            self.buf.push(0);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }
}

/// One TypeTree node given as (depth, type name, field name)
pub type TreeRow = (u8, &'static str, &'static str);

/// One class entry of the type metadata
pub struct TypeFixture {
    pub class_id: i32,
    pub tree: Vec<TreeRow>,
}

/// One object record plus the payload stored for it
pub struct ObjectFixture {
    pub path_id: i64,
    pub class_id: i16,
    pub payload: Vec<u8>,
}

/// Builder for a SerializedFile node
pub struct SerializedFileBuilder {
    pub format: u32,
    pub order: ByteOrder,
    pub long_object_ids: bool,
    pub player_version: &'static str,
    pub target_platform: u32,
    pub has_type_trees: bool,
    pub types: Vec<TypeFixture>,
    pub objects: Vec<ObjectFixture>,
    pub additional_objects: Vec<(i64, i32)>,
    pub externals: Vec<(&'static str, [u8; 16], i32, &'static str)>,
    pub user_information: &'static str,
}

impl SerializedFileBuilder {
    pub fn new(format: u32) -> Self {
        Self {
            format,
            order: ByteOrder::Little,
            long_object_ids: false,
            player_version: "5.3.4p1",
            target_platform: 5,
            has_type_trees: true,
            types: Vec::new(),
            objects: Vec::new(),
            additional_objects: Vec::new(),
            externals: Vec::new(),
            user_information: "",
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let format = self.format;
        let mut w = Writer::new(ByteOrder::Big);

        // Header placeholder, patched once the sizes are known
        let header_size = if format >= 9 { 20 } else { 16 };
        w.bytes(&vec![0; header_size]);
        w.order = self.order;

        w.cstring(self.player_version).u32(self.target_platform);
        if format >= 13 {
            w.u8(self.has_type_trees as u8);
        }
        w.i32(self.types.len() as i32);
        for ty in &self.types {
            w.i32(ty.class_id);
            if format >= 13 {
                let hash_len = if ty.class_id < 0 { 32 } else { 16 };
                w.bytes(&vec![0xC3; hash_len]);
            }
            if format < 13 || self.has_type_trees {
                if format == 10 || format >= 12 {
                    write_blob_tree(&mut w, &ty.tree);
                } else {
                    write_recursive_tree(&mut w, &ty.tree);
                }
            }
        }

        if (7..=13).contains(&format) {
            w.u32(self.long_object_ids as u32);
        }

        let long_ids = self.long_object_ids || format >= 14;
        let mut data_offset = 0u32;
        w.u32(self.objects.len() as u32);
        for object in &self.objects {
            if format >= 14 {
                w.align();
            }
            if long_ids {
                w.i64(object.path_id);
            } else {
                w.i32(object.path_id as i32);
            }
            w.u32(data_offset)
                .u32(object.payload.len() as u32)
                .i32(i32::from(object.class_id))
                .i16(object.class_id);
            if format <= 10 {
                w.u16(0);
            } else {
                w.i16(-1);
                if format >= 15 {
                    w.u8(0);
                }
            }
            data_offset += object.payload.len() as u32;
        }

        if format >= 11 {
            w.u32(self.additional_objects.len() as u32);
            for &(path_id, value) in &self.additional_objects {
                if format >= 14 {
                    w.align();
                }
                w.i64(path_id).i32(value);
            }
        }
        if format >= 6 {
            w.u32(self.externals.len() as u32);
            for (asset_path, guid, ref_type, file_path) in &self.externals {
                w.cstring(asset_path).bytes(guid).i32(*ref_type).cstring(file_path);
            }
        }
        w.cstring(self.user_information);

        let metadata_size = (w.len() - header_size) as u32;
        while w.len() % 16 != 0 {
            w.u8(0);
        }
        let data_start = w.len() as u32;
        for object in &self.objects {
            w.bytes(&object.payload);
        }
        let file_size = w.len() as u32;

        let mut header = Writer::new(ByteOrder::Big);
        header.u32(metadata_size).u32(file_size).u32(format).u32(data_start);
        if format >= 9 {
            header.u32(match self.order {
                ByteOrder::Little => 0,
                ByteOrder::Big => 1,
            });
        }
        w.buf[..header_size].copy_from_slice(&header.buf);
        w.buf
    }
}

/// Write the flat record table with every name in the local string pool
///
/// Depths are written as given, so inconsistent trees can be produced too.
pub fn write_blob_tree(w: &mut Writer, rows: &[TreeRow]) {
    let mut pool = Vec::new();
    let mut offsets = Vec::new();
    for &(_, type_name, name) in rows {
        let type_offset = pool.len() as i32;
        pool.extend_from_slice(type_name.as_bytes());
        pool.push(0);
        let name_offset = pool.len() as i32;
        pool.extend_from_slice(name.as_bytes());
        pool.push(0);
        offsets.push((type_offset, name_offset));
    }

    w.u32(rows.len() as u32).u32(pool.len() as u32);
    for (index, (&(depth, _, _), &(type_offset, name_offset))) in
        rows.iter().zip(offsets.iter()).enumerate()
    {
        w.i16(1)
            .u8(depth)
            .u8(0)
            .i32(type_offset)
            .i32(name_offset)
            .i32(4)
            .u32(index as u32)
            .i32(0);
    }
    w.bytes(&pool);
}

/// Write the recursive layout for a pre-order, depth-annotated node list
pub fn write_recursive_tree(w: &mut Writer, rows: &[TreeRow]) {
    for (index, &(depth, type_name, name)) in rows.iter().enumerate() {
        let children = rows[index + 1..]
            .iter()
            .take_while(|&&(d, _, _)| d > depth)
            .filter(|&&(d, _, _)| d == depth + 1)
            .count();
        w.cstring(type_name)
            .cstring(name)
            .i32(4)
            .i32(index as i32)
            .i32(0)
            .i32(1)
            .i32(0)
            .i32(children as i32);
    }
}

/// Builder for a UnityFS bundle with an uncompressed directory at the end
pub struct BundleBuilder {
    pub signature: &'static str,
    pub player_version: &'static str,
    pub flags: u32,
    /// Written instead of the real directory length when set
    pub uncompressed_directory_size: Option<u32>,
    pub nodes: Vec<(&'static str, Vec<u8>)>,
}

impl BundleBuilder {
    pub fn new(player_version: &'static str) -> Self {
        Self {
            signature: "UnityFS",
            player_version,
            flags: 0,
            uncompressed_directory_size: None,
            nodes: Vec::new(),
        }
    }

    pub fn node(mut self, name: &'static str, data: Vec<u8>) -> Self {
        self.nodes.push((name, data));
        self
    }

    /// Length of the envelope this builder writes
    pub fn header_size(&self) -> usize {
        let strings = self.signature.len() + "5.x.x".len() + self.player_version.len() + 3;
        strings + 4 + 8 + 4 + 4 + 4
    }

    pub fn build(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        let mut directory = Writer::new(ByteOrder::Big);
        let total_payload: usize = self.nodes.iter().map(|(_, data)| data.len()).sum();

        directory.bytes(&[0x11; 16]);
        directory.i32(1);
        directory.i32(total_payload as i32).i32(total_payload as i32).i16(0x40);
        directory.i32(self.nodes.len() as i32);
        for (name, data) in &self.nodes {
            directory
                .i64(payload.len() as i64)
                .i64(data.len() as i64)
                .i32(4)
                .cstring(name);
            payload.extend_from_slice(data);
        }

        let file_size = self.header_size() + payload.len() + directory.len();

        let mut w = Writer::new(ByteOrder::Big);
        w.cstring(self.signature)
            .i32(6)
            .cstring("5.x.x")
            .cstring(self.player_version)
            .u64(file_size as u64)
            .u32(directory.len() as u32)
            .u32(
                self.uncompressed_directory_size
                    .unwrap_or(directory.len() as u32),
            )
            .u32(self.flags);
        assert_eq!(w.len(), self.header_size());
        w.bytes(&payload).bytes(&directory.buf);
        w.buf
    }
}
