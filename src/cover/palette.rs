/// Material accent colors used for artist badges.
const MATERIAL: [[u8; 3]; 17] = [
    [0xe5, 0x73, 0x73],
    [0xf0, 0x62, 0x92],
    [0xba, 0x68, 0xc8],
    [0x95, 0x75, 0xcd],
    [0x79, 0x86, 0xcb],
    [0x64, 0xb5, 0xf6],
    [0x4f, 0xc3, 0xf7],
    [0x4d, 0xd0, 0xe1],
    [0x4d, 0xb6, 0xac],
    [0x81, 0xc7, 0x84],
    [0xae, 0xd5, 0x81],
    [0xff, 0x8a, 0x65],
    [0xd4, 0xe1, 0x57],
    [0xff, 0xd5, 0x4f],
    [0xff, 0xb7, 0x4d],
    [0xa1, 0x88, 0x7f],
    [0x90, 0xa4, 0xae],
];

/// Pick the badge color for a name. The same name always maps to the
/// same palette entry.
pub fn color_for(name: &str) -> [u8; 3] {
    MATERIAL[stable_hash(name) as usize % MATERIAL.len()]
}

// Fixed polynomial hash. The std hasher is seeded per process and may
// change between releases; badge colors must survive both.
fn stable_hash(s: &str) -> u32 {
    s.chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
}
