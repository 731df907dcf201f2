//! Base32 geohash cell encoding.
//!
//! Standard interleaved bisection: even bits halve the longitude range, odd
//! bits the latitude range, five bits per output character.

/// Geohash base32 alphabet (no a, i, l, o).
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Encode a coordinate into its geohash cell at the given precision.
pub fn encode_cell(lat: f64, lon: f64, precision: usize) -> String {
    let mut lat_lo = -90.0f64;
    let mut lat_hi = 90.0f64;
    let mut lon_lo = -180.0f64;
    let mut lon_hi = 180.0f64;

    let mut out = String::with_capacity(precision);
    let mut bits = 0u8;
    let mut ch = 0usize;
    let mut even_bit = true;

    while out.len() < precision {
        if even_bit {
            let mid = (lon_lo + lon_hi) / 2.0;
            if lon >= mid {
                ch = (ch << 1) | 1;
                lon_lo = mid;
            } else {
                ch <<= 1;
                lon_hi = mid;
            }
        } else {
            let mid = (lat_lo + lat_hi) / 2.0;
            if lat >= mid {
                ch = (ch << 1) | 1;
                lat_lo = mid;
            } else {
                ch <<= 1;
                lat_hi = mid;
            }
        }
        even_bit = !even_bit;

        bits += 1;
        if bits == 5 {
            out.push(BASE32[ch] as char);
            bits = 0;
            ch = 0;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vector() {
        // The canonical geohash example point.
        assert_eq!(encode_cell(57.64911, 10.40744, 11), "u4pruydqqvj");
    }

    #[test]
    fn test_prefix_property() {
        let long = encode_cell(57.64911, 10.40744, 11);
        let short = encode_cell(57.64911, 10.40744, 6);
        assert!(long.starts_with(&short));
    }

    #[test]
    fn test_origin_vector() {
        // (0, 0) sits in the "s" cell and its all-zero subdivisions.
        assert_eq!(encode_cell(0.0, 0.0, 9), "s00000000");
    }

    #[test]
    fn test_distant_points_differ() {
        let a = encode_cell(57.64911, 10.40744, 11);
        let b = encode_cell(40.68925, -74.04450, 11);
        assert_ne!(a, b);
    }

    #[test]
    fn test_southern_hemisphere() {
        // Sanity: encoding is defined over the full coordinate range.
        let hash = encode_cell(-33.86, 151.21, 9);
        assert_eq!(hash.len(), 9);
        assert!(hash.bytes().all(|b| BASE32.contains(&b)));
    }
}
