//! Synthetic MFS images for the integration tests.
#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

pub const DIRECTORY_START: u16 = 4;
pub const FIRST_ALLOCATION_BLOCK: u16 = 8;
pub const CLUMP_SIZE: usize = 1024;

pub struct TestFile {
    pub name: Vec<u8>,
    pub data: (u16, u32),
    pub resource: (u16, u32),
}

impl TestFile {
    pub fn new(name: &[u8], data: (u16, u32), resource: (u16, u32)) -> TestFile {
        TestFile {
            name: name.to_vec(),
            data: data,
            resource: resource,
        }
    }
}

pub struct ImageBuilder {
    pub signature: u16,
    pub block_count: u16,
    pub successors: Vec<u16>,
    pub files: Vec<TestFile>,
}

impl ImageBuilder {
    pub fn new(block_count: u16) -> ImageBuilder {
        ImageBuilder {
            signature: 0xD2D7,
            block_count: block_count,
            successors: vec![0; block_count as usize],
            files: Vec::new(),
        }
    }

    pub fn signature(mut self, signature: u16) -> ImageBuilder {
        self.signature = signature;
        self
    }

    /// Links allocation block `block` to `next`.
    pub fn link(mut self, block: u16, next: u16) -> ImageBuilder {
        self.successors[(block - 2) as usize] = next;
        self
    }

    pub fn file(mut self, file: TestFile) -> ImageBuilder {
        self.files.push(file);
        self
    }

    /// Every byte of allocation block `b` holds `clump_byte(b, offset)`.
    pub fn build(&self) -> Vec<u8> {
        let base = FIRST_ALLOCATION_BLOCK as usize * 512;
        let mut image = vec![0u8; base + self.block_count as usize * CLUMP_SIZE];

        {
            let record = &mut image[1024..1088];
            BigEndian::write_u16(&mut record[0..2], self.signature);
            BigEndian::write_u16(&mut record[12..14], self.files.len() as u16);
            BigEndian::write_u16(&mut record[14..16], DIRECTORY_START);
            BigEndian::write_u16(&mut record[16..18], 2);
            BigEndian::write_u16(&mut record[18..20], self.block_count);
            BigEndian::write_u32(&mut record[20..24], CLUMP_SIZE as u32);
            BigEndian::write_u32(&mut record[24..28], 4 * CLUMP_SIZE as u32);
            BigEndian::write_u16(&mut record[28..30], FIRST_ALLOCATION_BLOCK);
            record[36] = 4;
            record[37..41].copy_from_slice(b"Test");
        }

        for (index, pair) in self.successors.chunks(2).enumerate() {
            let first = pair[0];
            let second = if pair.len() > 1 { pair[1] } else { 0 };
            let offset = 1088 + index * 3;
            image[offset] = (first >> 4) as u8;
            image[offset + 1] = (((first & 0x0F) << 4) | (second >> 8)) as u8;
            image[offset + 2] = second as u8;
        }

        let mut position = DIRECTORY_START as usize * 512;
        for file in &self.files {
            {
                let record = &mut image[position..];
                record[0] = 0x80;
                record[2..6].copy_from_slice(b"TEXT");
                record[6..10].copy_from_slice(b"MACA");
                BigEndian::write_u16(&mut record[22..24], file.data.0);
                BigEndian::write_u32(&mut record[24..28], file.data.1);
                BigEndian::write_u16(&mut record[32..34], file.resource.0);
                BigEndian::write_u32(&mut record[34..38], file.resource.1);
                record[50] = file.name.len() as u8;
                record[51..51 + file.name.len()].copy_from_slice(&file.name);
            }
            position += 51 + file.name.len() + if file.name.len() % 2 == 0 { 1 } else { 0 };
            if position % 512 > 512 - 51 {
                position = (position / 512 + 1) * 512;
            }
        }

        for block in 2..(self.block_count as usize + 2) {
            let start = base + (block - 2) * CLUMP_SIZE;
            for offset in 0..CLUMP_SIZE {
                image[start + offset] = clump_byte(block as u16, offset);
            }
        }
        image
    }
}

pub fn clump_byte(block: u16, offset: usize) -> u8 {
    ((block as usize * 16) + offset % 16) as u8
}

pub fn clump_bytes(block: u16, length: usize) -> Vec<u8> {
    (0..length).map(|offset| clump_byte(block, offset)).collect()
}

/// A fresh, empty directory under the system temporary directory.
pub fn output_dir(name: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("mfs-rescue-{}-{}", process::id(), name));
    let _ = fs::remove_dir_all(&path);
    fs::create_dir_all(&path).unwrap();
    path
}
