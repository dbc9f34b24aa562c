//! Helpers for building small PDFs in tests.
//!
//! Enabled for this crate's own tests and for dependants through the `test-support`
//! feature.

use lopdf::content::{Content, Operation};
use lopdf::encryption::{decrypt_object, get_encryption_key};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use md5::{Digest, Md5};

/// Password padding from the PDF standard security handler.
const PASSWORD_PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Printing, copying and editing all withheld.
const RESTRICTED_PERMISSIONS: i64 = -64;

/// 40-bit RC4 keys, revision 2 of the standard security handler.
const KEY_BYTES: usize = 5;

/// Builds a PDF with one page per entry, each page showing its entry as a single text line.
///
/// Panics if the document cannot be encoded, which only happens on a bug in this helper.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    save(document_with_pages(pages))
}

/// Builds the same document as [`pdf_with_pages`], encrypted with 40-bit RC4.
///
/// An empty `user_password` gives the common "owner password only" file: anyone can open
/// it, and the owner password only guards the permission flags.
pub fn encrypted_pdf_with_pages(pages: &[&str], user_password: &str, owner_password: &str) -> Vec<u8> {
    let mut doc = document_with_pages(pages);
    let file_id = Object::string_literal(b"crms-test-fileid".to_vec());
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);

    let owner_key = Md5::digest(padded(owner_password.as_bytes()));
    let owner_entry = rc4(&owner_key[..KEY_BYTES], &padded(user_password.as_bytes()));
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::string_literal(owner_entry),
        "P" => RESTRICTED_PERMISSIONS,
    });
    doc.trailer.set("Encrypt", encrypt_id);

    let key = get_encryption_key(&doc, user_password, false).expect("standard handler key");
    let user_entry = rc4(&key, &PASSWORD_PADDING);
    doc.get_object_mut(encrypt_id)
        .and_then(Object::as_dict_mut)
        .expect("encryption dictionary")
        .set("U", Object::string_literal(user_entry));

    let ids: Vec<ObjectId> = doc.objects.keys().copied().filter(|id| *id != encrypt_id).collect();
    for id in ids {
        let object = doc.objects.get_mut(&id).expect("object listed above");
        // RC4 is symmetric, so lopdf's decryption step encrypts plaintext.
        let Ok(cipher) = decrypt_object(&key, id, object) else {
            continue;
        };
        match object {
            Object::Stream(stream) => stream.set_content(cipher),
            Object::String(content, _) => *content = cipher,
            _ => {}
        }
    }

    save(doc)
}

fn document_with_pages(pages: &[&str]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for line in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let encoded = content.encode().expect("content stream encodes");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document serialises");
    bytes
}

fn padded(password: &[u8]) -> Vec<u8> {
    let len = password.len().min(PASSWORD_PADDING.len());
    let mut out = password[..len].to_vec();
    out.extend_from_slice(&PASSWORD_PADDING[..PASSWORD_PADDING.len() - len]);
    out
}

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut state: Vec<u8> = (0..=255).collect();
    let mut j: u8 = 0;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, usize::from(j));
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[usize::from(i)]);
            state.swap(usize::from(i), usize::from(j));
            let k = state[usize::from(state[usize::from(i)].wrapping_add(state[usize::from(j)]))];
            byte ^ k
        })
        .collect()
}
